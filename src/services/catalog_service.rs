use crate::{
    catalog::{self, CatalogPage, CatalogQuery},
    error::AppResult,
    models::ProductStatus,
    services::{category_service, product_service},
    state::AppState,
};

/// Runs the catalog pipeline over stored products. Without an explicit status only active
/// products are listed.
pub async fn catalog_page(state: &AppState, mut query: CatalogQuery) -> AppResult<CatalogPage> {
    query.status.get_or_insert(ProductStatus::Active);

    let (products, categories) = tokio::try_join!(
        product_service::list_all_products(state),
        category_service::list_categories(state),
    )?;
    tracing::debug!(products = products.len(), "running catalog query");

    Ok(catalog::query_catalog(&products, &categories, &query))
}
