use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::{
    catalog,
    dto::products::{CreateProductRequest, DeleteProductResult, UpdateProductRequest},
    entity::order_items::{self, Entity as OrderItems},
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    models::{Product, ProductCategory, ProductStatus},
    response::ApiResponse,
    routes::params::ProductListQuery,
    state::AppState,
};

pub const MAX_PAGE_SIZE: u64 = 1000;
pub const SEARCH_LIMIT: u64 = 10;
const DEFAULT_STOCK: u32 = 10;

/// Products newest first. Only active ones unless the query asks for another status.
pub async fn list_products(state: &AppState, query: &ProductListQuery) -> AppResult<Vec<Product>> {
    let mut finder = Products::find();
    if let Some(status) = query.status_filter() {
        finder = finder.filter(Column::Status.eq(status.as_str()));
    }

    if let Some(category) = query
        .category
        .as_deref()
        .filter(|c| !c.is_empty() && *c != catalog::ALL)
    {
        finder = finder.filter(Column::Category.eq(category));
    }
    if let Some(featured) = query.featured {
        finder = finder.filter(Column::Featured.eq(featured));
    }

    let items = finder
        .order_by_desc(Column::CreatedAt)
        .limit(query.limit.map(|limit| limit.min(MAX_PAGE_SIZE)))
        .offset(query.offset)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();
    Ok(items)
}

/// Every product regardless of status, newest first.
pub async fn list_all_products(state: &AppState) -> AppResult<Vec<Product>> {
    list_products(state, &ProductListQuery::every_status()).await
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(product_from_entity)
        .ok_or(AppError::NotFound)
}

pub async fn create_product(state: &AppState, payload: CreateProductRequest) -> AppResult<Product> {
    let name = payload
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());
    let (Some(name), Some(price)) = (name, payload.price) else {
        return Err(AppError::BadRequest(
            "name and price are required".to_string(),
        ));
    };
    if price.is_sign_negative() {
        return Err(AppError::BadRequest("price must not be negative".to_string()));
    }

    let handle = payload
        .handle
        .filter(|h| !h.trim().is_empty())
        .unwrap_or_else(|| slugify(&name));
    let taken = Products::find()
        .filter(Column::Handle.eq(handle.as_str()))
        .one(&state.orm)
        .await?;
    if taken.is_some() {
        return Err(AppError::Conflict(format!("product handle '{handle}' already exists")));
    }

    let now = Utc::now().fixed_offset();
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        handle: Set(handle),
        description: Set(payload.description.unwrap_or_default()),
        price: Set(price),
        compare_price: Set(payload.compare_price),
        images: Set(payload.images),
        category: Set(payload.category.unwrap_or_default().as_str().to_string()),
        subcategory: Set(payload.subcategory),
        tags: Set(payload.tags),
        stock: Set(stock_to_db(payload.stock.unwrap_or(DEFAULT_STOCK))),
        sku: Set(payload.sku),
        featured: Set(payload.featured),
        status: Set(payload.status.unwrap_or_default().as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let product = active.insert(&state.orm).await?;
    tracing::info!(product_id = %product.id, handle = %product.handle, "product created");

    Ok(product_from_entity(product))
}

pub async fn update_product(
    state: &AppState,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<Product> {
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name.filter(|n| !n.trim().is_empty()) {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(price) = payload.price {
        if price.is_sign_negative() {
            return Err(AppError::BadRequest("price must not be negative".to_string()));
        }
        active.price = Set(price);
    }
    if let Some(compare_price) = payload.compare_price {
        active.compare_price = Set(compare_price);
    }
    if let Some(images) = payload.images {
        active.images = Set(images);
    }
    if let Some(category) = payload.category {
        active.category = Set(category.as_str().to_string());
    }
    if let Some(subcategory) = payload.subcategory {
        active.subcategory = Set(subcategory);
    }
    if let Some(tags) = payload.tags {
        active.tags = Set(tags);
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(stock_to_db(stock));
    }
    if let Some(sku) = payload.sku {
        active.sku = Set(sku);
    }
    if let Some(featured) = payload.featured {
        active.featured = Set(featured);
    }
    if let Some(status) = payload.status {
        active.status = Set(status.as_str().to_string());
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let updated = active.update(&state.orm).await?;
    Ok(product_from_entity(updated))
}

/// Deletes a product, or archives it when order items still reference it.
pub async fn delete_product(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<DeleteProductResult>> {
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let references = OrderItems::find()
        .filter(order_items::Column::ProductId.eq(id))
        .count(&state.orm)
        .await?;

    if references > 0 {
        let mut active: ActiveModel = existing.into();
        active.status = Set(ProductStatus::Archived.as_str().to_string());
        active.updated_at = Set(Utc::now().fixed_offset());
        active.update(&state.orm).await?;
        tracing::info!(product_id = %id, references, "product referenced by orders, archived");
        return Ok(ApiResponse::success(
            "Product is used in orders. Marked as archived instead of deleting.",
            DeleteProductResult { id, archived: true },
        ));
    }

    Products::delete_by_id(id).exec(&state.orm).await?;
    tracing::info!(product_id = %id, "product deleted");
    Ok(ApiResponse::success(
        "Product deleted successfully",
        DeleteProductResult {
            id,
            archived: false,
        },
    ))
}

/// Case-insensitive substring search over name, description, category and subcategory.
pub async fn search_products(state: &AppState, q: &str) -> AppResult<Vec<Product>> {
    let q = q.trim();
    if q.is_empty() {
        return Ok(Vec::new());
    }

    let pattern = format!("%{}%", escape_like(q));
    let condition = Condition::any()
        .add(Expr::col(Column::Name).ilike(pattern.as_str()))
        .add(Expr::col(Column::Description).ilike(pattern.as_str()))
        .add(Expr::col(Column::Category).ilike(pattern.as_str()))
        .add(Expr::col(Column::Subcategory).ilike(pattern.as_str()));

    let items = Products::find()
        .filter(Column::Status.eq(ProductStatus::Active.as_str()))
        .filter(condition)
        .order_by_desc(Column::CreatedAt)
        .limit(SEARCH_LIMIT)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();
    Ok(items)
}

pub fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        compare_price: model.compare_price,
        images: model.images,
        category: ProductCategory::from_slug(&model.category),
        subcategory: model.subcategory,
        tags: model.tags,
        stock: u32::try_from(model.stock).unwrap_or(0),
        sku: model.sku,
        featured: model.featured,
        status: ProductStatus::from_db(&model.status),
        created_at: model.created_at.to_utc(),
        updated_at: model.updated_at.to_utc(),
    }
}

fn stock_to_db(stock: u32) -> i32 {
    i32::try_from(stock).unwrap_or(i32::MAX)
}

/// URL handle from a product name: lowercase ASCII alphanumerics joined by single dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug = Uuid::new_v4().simple().to_string();
    }
    slug
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  Banarasi Silk Saree!! "), "banarasi-silk-saree");
        assert_eq!(slugify("Men's Kurta"), "men-s-kurta");
    }

    #[test]
    fn slugify_never_returns_empty() {
        assert!(!slugify("!!!").is_empty());
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
    }
}
