use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::{
    catalog::{self, CatalogQuery, SortMode},
    models::ProductStatus,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    /// Category slug; `all` or empty disables the filter.
    pub category: Option<String>,
    pub featured: Option<bool>,
    /// `active` when omitted. `all` lists every status.
    pub status: Option<String>,
    /// Capped at 1000. Omitted means no limit.
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl ProductListQuery {
    /// Every product whatever its status, unpaginated.
    pub fn every_status() -> Self {
        Self {
            status: Some(catalog::ALL.to_string()),
            ..Self::default()
        }
    }

    /// `None` when the status filter is off.
    pub fn status_filter(&self) -> Option<ProductStatus> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Some(ProductStatus::Active),
            Some(catalog::ALL) => None,
            Some(raw) => Some(ProductStatus::from_db(raw)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Query-string form of [`CatalogQuery`]. `tags` is comma separated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[serde(default, rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CatalogParams {
    pub search: Option<String>,
    pub min_search_len: Option<usize>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    #[param(value_type = Option<f64>)]
    pub min_price: Option<Decimal>,
    #[param(value_type = Option<f64>)]
    pub max_price: Option<Decimal>,
    pub in_stock_only: bool,
    pub out_of_stock_only: bool,
    pub tags: Option<String>,
    #[param(value_type = Option<String>)]
    pub status: Option<ProductStatus>,
    #[param(value_type = Option<String>)]
    pub sort: Option<SortMode>,
}

impl From<CatalogParams> for CatalogQuery {
    fn from(params: CatalogParams) -> Self {
        let defaults = CatalogQuery::default();
        let tags = params
            .tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();
        CatalogQuery {
            search: params.search,
            min_search_len: params.min_search_len.unwrap_or(defaults.min_search_len),
            category: params.category,
            subcategory: params.subcategory,
            min_price: params.min_price,
            max_price: params.max_price,
            in_stock_only: params.in_stock_only,
            out_of_stock_only: params.out_of_stock_only,
            tags,
            status: params.status,
            sort: params.sort.unwrap_or_default(),
        }
    }
}
