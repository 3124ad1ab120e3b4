use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::categories::{
        CreateCategoryRequest, CreateSubcategoryRequest, DeleteResult, UpdateCategoryRequest,
    },
    error::AppResult,
    models::{Category, Subcategory},
    response::ApiResponse,
    services::category_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/{id}/subcategories", post(create_subcategory))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories with subcategories, by display order", body = Vec<Category>)
    ),
    tag = "Categories"
)]
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category_service::list_categories(&state).await?;
    Ok(Json(categories))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Missing name or slug"),
        (status = 409, description = "Name or slug already exists"),
    ),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = category_service::create_category(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category with its subcategories", body = Category),
        (status = 404, description = "Category not found"),
    ),
    tag = "Categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Category>> {
    let category = category_service::get_category(&state, id).await?;
    Ok(Json(category))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Updated category", body = Category),
        (status = 400, description = "Missing name or slug"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Name or slug already used by another category"),
    ),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> AppResult<Json<Category>> {
    let category = category_service::update_category(&state, id, payload).await?;
    Ok(Json(category))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category and its subcategories deleted", body = ApiResponse<DeleteResult>),
        (status = 404, description = "Category not found"),
    ),
    tag = "Categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<DeleteResult>>> {
    let resp = category_service::delete_category(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/categories/{id}/subcategories",
    params(
        ("id" = Uuid, Path, description = "Parent category ID")
    ),
    request_body = CreateSubcategoryRequest,
    responses(
        (status = 201, description = "Subcategory created", body = Subcategory),
        (status = 400, description = "Missing name or slug"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Slug already used in this category"),
    ),
    tag = "Categories"
)]
pub async fn create_subcategory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateSubcategoryRequest>,
) -> AppResult<(StatusCode, Json<Subcategory>)> {
    let subcategory = category_service::create_subcategory(&state, id, payload).await?;
    Ok((StatusCode::CREATED, Json(subcategory)))
}
