use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{ProductCategory, ProductStatus};

/// `name` and `price` are required; they are optional here so a missing one yields a 400 with a
/// readable message instead of a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub handle: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub compare_price: Option<Decimal>,
    pub images: Vec<String>,
    pub category: Option<ProductCategory>,
    pub subcategory: Option<String>,
    pub tags: Vec<String>,
    pub stock: Option<u32>,
    pub sku: Option<String>,
    pub featured: bool,
    pub status: Option<ProductStatus>,
}

/// Partial update. Omitted fields are left alone. For `compare_price`, `subcategory` and `sku`
/// an explicit `null` clears the stored value: `Some(None)` clears, `None` keeps.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[serde(
        deserialize_with = "crate::dto::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<f64>, nullable)]
    pub compare_price: Option<Option<Decimal>>,
    pub images: Option<Vec<String>>,
    pub category: Option<ProductCategory>,
    #[serde(
        deserialize_with = "crate::dto::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, nullable)]
    pub subcategory: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub stock: Option<u32>,
    #[serde(
        deserialize_with = "crate::dto::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, nullable)]
    pub sku: Option<Option<String>>,
    pub featured: Option<bool>,
    pub status: Option<ProductStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteProductResult {
    pub id: uuid::Uuid,
    /// True when the product is referenced by orders and was archived rather than removed.
    pub archived: bool,
}
