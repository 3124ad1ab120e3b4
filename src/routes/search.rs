use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    catalog::CatalogPage,
    error::AppResult,
    models::Product,
    routes::params::{CatalogParams, SearchQuery},
    services::{catalog_service, product_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_products))
        .route("/catalog", get(catalog))
}

#[utoipa::path(
    get,
    path = "/api/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Up to 10 matching active products", body = Vec<Product>)
    ),
    tag = "Catalog"
)]
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let q = query.q.unwrap_or_default();
    let products = product_service::search_products(&state, &q).await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/api/catalog",
    params(CatalogParams),
    responses(
        (status = 200, description = "Filtered, sorted and grouped products", body = CatalogPage)
    ),
    tag = "Catalog"
)]
pub async fn catalog(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> AppResult<Json<CatalogPage>> {
    let page = catalog_service::catalog_page(&state, params.into()).await?;
    Ok(Json(page))
}
