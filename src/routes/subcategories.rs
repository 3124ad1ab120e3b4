use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::categories::{DeleteResult, UpdateSubcategoryRequest},
    error::AppResult,
    models::Subcategory,
    response::ApiResponse,
    services::category_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(get_subcategory)
            .put(update_subcategory)
            .delete(delete_subcategory),
    )
}

#[utoipa::path(
    get,
    path = "/api/subcategories/{id}",
    params(
        ("id" = Uuid, Path, description = "Subcategory ID")
    ),
    responses(
        (status = 200, description = "Subcategory", body = Subcategory),
        (status = 404, description = "Subcategory not found"),
    ),
    tag = "Categories"
)]
pub async fn get_subcategory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Subcategory>> {
    let subcategory = category_service::get_subcategory(&state, id).await?;
    Ok(Json(subcategory))
}

#[utoipa::path(
    put,
    path = "/api/subcategories/{id}",
    params(
        ("id" = Uuid, Path, description = "Subcategory ID")
    ),
    request_body = UpdateSubcategoryRequest,
    responses(
        (status = 200, description = "Updated subcategory", body = Subcategory),
        (status = 400, description = "Missing name or slug, or unknown target category"),
        (status = 404, description = "Subcategory not found"),
        (status = 409, description = "Slug already used in the target category"),
    ),
    tag = "Categories"
)]
pub async fn update_subcategory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSubcategoryRequest>,
) -> AppResult<Json<Subcategory>> {
    let subcategory = category_service::update_subcategory(&state, id, payload).await?;
    Ok(Json(subcategory))
}

#[utoipa::path(
    delete,
    path = "/api/subcategories/{id}",
    params(
        ("id" = Uuid, Path, description = "Subcategory ID")
    ),
    responses(
        (status = 200, description = "Subcategory deleted", body = ApiResponse<DeleteResult>),
        (status = 404, description = "Subcategory not found"),
    ),
    tag = "Categories"
)]
pub async fn delete_subcategory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<DeleteResult>>> {
    let resp = category_service::delete_subcategory(&state, id).await?;
    Ok(Json(resp))
}
