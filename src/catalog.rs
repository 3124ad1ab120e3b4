//! Catalog query pipeline: filter, sort and group an in-memory product list.
//!
//! Everything here is pure. Filters compose by conjunction; only the tag filter is disjunctive
//! within itself (a product matches when it carries any of the selected tags).

use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Category, Product, ProductCategory, ProductStatus};

/// Sentinel that disables the category and subcategory filters.
pub const ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    PriceLow,
    PriceHigh,
    Name,
    #[default]
    Newest,
    Featured,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogQuery {
    pub search: Option<String>,
    /// Queries shorter than this (in characters) leave the search filter off.
    pub min_search_len: usize,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock_only: bool,
    pub out_of_stock_only: bool,
    pub tags: Vec<String>,
    pub status: Option<ProductStatus>,
    pub sort: SortMode,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            search: None,
            min_search_len: 1,
            category: None,
            subcategory: None,
            min_price: None,
            max_price: None,
            in_stock_only: false,
            out_of_stock_only: false,
            tags: Vec::new(),
            status: None,
            sort: SortMode::default(),
        }
    }
}

impl CatalogQuery {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_price_range(mut self, min: Decimal, max: Decimal) -> Self {
        self.min_price = Some(min);
        self.max_price = Some(max);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_stock_only(mut self, on: bool) -> Self {
        self.in_stock_only = on;
        self
    }

    pub fn out_of_stock_only(mut self, on: bool) -> Self {
        self.out_of_stock_only = on;
        self
    }

    pub fn sorted_by(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    fn active_search(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.is_empty() && s.chars().count() >= self.min_search_len)
            .map(str::to_lowercase)
    }

    /// True when `product` passes every enabled filter.
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_with(product, self.active_search().as_deref())
    }

    fn matches_with(&self, product: &Product, needle: Option<&str>) -> bool {
        self.matches_search(product, needle)
            && self.matches_category(product)
            && self.matches_subcategory(product)
            && self.matches_price(product)
            && self.matches_availability(product)
            && self.matches_tags(product)
            && self.status.is_none_or(|status| product.status == status)
    }

    fn matches_search(&self, product: &Product, needle: Option<&str>) -> bool {
        needle.is_none_or(|needle| product.name.to_lowercase().contains(needle))
    }

    fn matches_category(&self, product: &Product) -> bool {
        match enabled(self.category.as_deref()) {
            Some(category) => product.category.as_str() == category,
            None => true,
        }
    }

    fn matches_subcategory(&self, product: &Product) -> bool {
        match enabled(self.subcategory.as_deref()) {
            Some(subcategory) => product.subcategory.as_deref() == Some(subcategory),
            None => true,
        }
    }

    fn matches_price(&self, product: &Product) -> bool {
        let price = product.effective_price();
        self.min_price.is_none_or(|min| price >= min)
            && self.max_price.is_none_or(|max| price <= max)
    }

    // Both toggles on is allowed and matches nothing.
    fn matches_availability(&self, product: &Product) -> bool {
        (!self.in_stock_only || product.is_in_stock())
            && (!self.out_of_stock_only || !product.is_in_stock())
    }

    fn matches_tags(&self, product: &Product) -> bool {
        self.tags.is_empty() || self.tags.iter().any(|tag| product.tags.contains(tag))
    }
}

fn enabled(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != ALL)
}

pub fn filter_products(products: &[Product], query: &CatalogQuery) -> Vec<Product> {
    let needle = query.active_search();
    products
        .iter()
        .filter(|product| query.matches_with(product, needle.as_deref()))
        .cloned()
        .collect()
}

/// Stable sort. `Featured` moves featured products to the front and keeps input order otherwise.
pub fn sort_products(products: &mut [Product], mode: SortMode) {
    match mode {
        SortMode::PriceLow => products.sort_by_key(Product::effective_price),
        SortMode::PriceHigh => {
            products.sort_by(|a, b| b.effective_price().cmp(&a.effective_price()))
        }
        SortMode::Name => products.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        }),
        SortMode::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortMode::Featured => products.sort_by_key(|p| !p.featured),
    }
}

/// Groups products under their category display name, in first-seen order. The name comes from
/// the matching category slug in `categories`, else the product's category slug.
pub fn group_by_category(
    products: &[Product],
    categories: &[Category],
) -> IndexMap<String, Vec<Product>> {
    let mut groups: IndexMap<String, Vec<Product>> = IndexMap::new();
    for product in products {
        let slug = product.category.as_str();
        let name = categories
            .iter()
            .find(|category| category.slug == slug)
            .map(|category| category.name.clone())
            .unwrap_or_else(|| slug.to_string());
        groups.entry(name).or_default().push(product.clone());
    }
    groups
}

pub fn distinct_categories(products: &[Product]) -> Vec<ProductCategory> {
    products
        .iter()
        .map(|p| p.category)
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Subcategories present under `category`, first-seen order.
pub fn distinct_subcategories(products: &[Product], category: ProductCategory) -> Vec<String> {
    products
        .iter()
        .filter(|p| p.category == category)
        .filter_map(|p| p.subcategory.clone())
        .filter(|s| !s.is_empty())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

pub fn all_tags(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .flat_map(|p| p.tags.iter().cloned())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CatalogPage {
    pub total: usize,
    pub products: Vec<Product>,
    #[schema(value_type = Object)]
    pub groups: IndexMap<String, Vec<Product>>,
}

/// Runs the full pipeline: filter, sort, group.
pub fn query_catalog(
    products: &[Product],
    categories: &[Category],
    query: &CatalogQuery,
) -> CatalogPage {
    let mut filtered = filter_products(products, query);
    sort_products(&mut filtered, query.sort);
    let groups = group_by_category(&filtered, categories);
    CatalogPage {
        total: filtered.len(),
        products: filtered,
        groups,
    }
}
