use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::categories::{
        CreateCategoryRequest, CreateSubcategoryRequest, DeleteResult, UpdateCategoryRequest,
        UpdateSubcategoryRequest,
    },
    entity::categories::{self, Entity as Categories},
    entity::subcategories::{self, Entity as Subcategories},
    error::{AppError, AppResult},
    models::{Category, Subcategory},
    response::ApiResponse,
    state::AppState,
};

/// Categories by display order, each with its subcategories in display order.
pub async fn list_categories(state: &AppState) -> AppResult<Vec<Category>> {
    let rows = Categories::find()
        .order_by_asc(categories::Column::SortOrder)
        .order_by_asc(categories::Column::Name)
        .all(&state.orm)
        .await?;

    let mut children: HashMap<Uuid, Vec<Subcategory>> = HashMap::new();
    let subs = Subcategories::find()
        .order_by_asc(subcategories::Column::SortOrder)
        .all(&state.orm)
        .await?;
    for sub in subs {
        children
            .entry(sub.category_id)
            .or_default()
            .push(subcategory_from_entity(sub));
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let subcategories = children.remove(&row.id).unwrap_or_default();
            category_from_entity(row, subcategories)
        })
        .collect())
}

pub async fn create_category(
    state: &AppState,
    payload: CreateCategoryRequest,
) -> AppResult<Category> {
    let (name, slug) = name_and_slug(&payload.name, &payload.slug)?;
    ensure_category_unique(state, &name, &slug, None).await?;

    let active = categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        slug: Set(slug),
        description: Set(payload.description),
        image: Set(payload.image),
        featured: Set(payload.featured),
        sort_order: Set(payload.order),
        created_at: Set(Utc::now().fixed_offset()),
    };
    let category = active.insert(&state.orm).await?;
    tracing::info!(category_id = %category.id, slug = %category.slug, "category created");

    Ok(category_from_entity(category, Vec::new()))
}

pub async fn get_category(state: &AppState, id: Uuid) -> AppResult<Category> {
    let category = find_category(state, id).await?;
    let subcategories = category
        .find_related(Subcategories)
        .order_by_asc(subcategories::Column::SortOrder)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(subcategory_from_entity)
        .collect();
    Ok(category_from_entity(category, subcategories))
}

pub async fn update_category(
    state: &AppState,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<Category> {
    let (name, slug) = name_and_slug(&payload.name, &payload.slug)?;
    let existing = find_category(state, id).await?;
    ensure_category_unique(state, &name, &slug, Some(id)).await?;

    let mut active: categories::ActiveModel = existing.into();
    active.name = Set(name);
    active.slug = Set(slug);
    active.description = Set(payload.description);
    active.image = Set(payload.image);
    if let Some(featured) = payload.featured {
        active.featured = Set(featured);
    }
    if let Some(order) = payload.order {
        active.sort_order = Set(order);
    }
    active.update(&state.orm).await?;

    get_category(state, id).await
}

/// Removes a category together with its subcategories.
pub async fn delete_category(state: &AppState, id: Uuid) -> AppResult<ApiResponse<DeleteResult>> {
    find_category(state, id).await?;

    let txn = state.orm.begin().await?;
    let removed = Subcategories::delete_many()
        .filter(subcategories::Column::CategoryId.eq(id))
        .exec(&txn)
        .await?;
    Categories::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(category_id = %id, subcategories = removed.rows_affected, "category deleted");
    Ok(ApiResponse::success(
        "Category deleted successfully",
        DeleteResult { id },
    ))
}

pub async fn create_subcategory(
    state: &AppState,
    category_id: Uuid,
    payload: CreateSubcategoryRequest,
) -> AppResult<Subcategory> {
    find_category(state, category_id).await?;
    let (name, slug) = name_and_slug(&payload.name, &payload.slug)?;
    ensure_subcategory_unique(state, category_id, &slug, None).await?;

    let subcategory = subcategories::ActiveModel {
        id: Set(Uuid::new_v4()),
        category_id: Set(category_id),
        name: Set(name),
        slug: Set(slug),
        description: Set(payload.description),
        image: Set(payload.image),
        sort_order: Set(payload.order),
    }
    .insert(&state.orm)
    .await?;
    tracing::info!(
        subcategory_id = %subcategory.id,
        category_id = %category_id,
        slug = %subcategory.slug,
        "subcategory created"
    );

    Ok(subcategory_from_entity(subcategory))
}

pub async fn get_subcategory(state: &AppState, id: Uuid) -> AppResult<Subcategory> {
    find_subcategory(state, id).await.map(subcategory_from_entity)
}

pub async fn update_subcategory(
    state: &AppState,
    id: Uuid,
    payload: UpdateSubcategoryRequest,
) -> AppResult<Subcategory> {
    let (name, slug) = name_and_slug(&payload.name, &payload.slug)?;
    let existing = find_subcategory(state, id).await?;

    let category_id = payload.category_id.unwrap_or(existing.category_id);
    if category_id != existing.category_id
        && Categories::find_by_id(category_id)
            .one(&state.orm)
            .await?
            .is_none()
    {
        return Err(AppError::BadRequest(format!(
            "category {category_id} does not exist"
        )));
    }
    ensure_subcategory_unique(state, category_id, &slug, Some(id)).await?;

    let mut active: subcategories::ActiveModel = existing.into();
    active.category_id = Set(category_id);
    active.name = Set(name);
    active.slug = Set(slug);
    active.description = Set(payload.description);
    active.image = Set(payload.image);
    if let Some(order) = payload.order {
        active.sort_order = Set(order);
    }
    let updated = active.update(&state.orm).await?;

    Ok(subcategory_from_entity(updated))
}

pub async fn delete_subcategory(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<DeleteResult>> {
    find_subcategory(state, id).await?;
    Subcategories::delete_by_id(id).exec(&state.orm).await?;
    tracing::info!(subcategory_id = %id, "subcategory deleted");
    Ok(ApiResponse::success(
        "Subcategory deleted successfully",
        DeleteResult { id },
    ))
}

fn name_and_slug(name: &str, slug: &str) -> AppResult<(String, String)> {
    let name = name.trim();
    let slug = slug.trim();
    if name.is_empty() || slug.is_empty() {
        return Err(AppError::BadRequest("name and slug are required".to_string()));
    }
    Ok((name.to_string(), slug.to_string()))
}

async fn find_category(state: &AppState, id: Uuid) -> AppResult<categories::Model> {
    Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

async fn find_subcategory(state: &AppState, id: Uuid) -> AppResult<subcategories::Model> {
    Subcategories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

/// Name and slug are unique across categories. `except` skips the category being updated.
async fn ensure_category_unique(
    state: &AppState,
    name: &str,
    slug: &str,
    except: Option<Uuid>,
) -> AppResult<()> {
    let mut finder = Categories::find().filter(
        Condition::any()
            .add(categories::Column::Name.eq(name))
            .add(categories::Column::Slug.eq(slug)),
    );
    if let Some(id) = except {
        finder = finder.filter(categories::Column::Id.ne(id));
    }
    if finder.one(&state.orm).await?.is_some() {
        return Err(AppError::Conflict(
            "a category with this name or slug already exists".to_string(),
        ));
    }
    Ok(())
}

/// Subcategory slugs are unique within their category.
async fn ensure_subcategory_unique(
    state: &AppState,
    category_id: Uuid,
    slug: &str,
    except: Option<Uuid>,
) -> AppResult<()> {
    let mut finder = Subcategories::find()
        .filter(subcategories::Column::CategoryId.eq(category_id))
        .filter(subcategories::Column::Slug.eq(slug));
    if let Some(id) = except {
        finder = finder.filter(subcategories::Column::Id.ne(id));
    }
    if finder.one(&state.orm).await?.is_some() {
        return Err(AppError::Conflict(
            "a subcategory with this slug already exists in the category".to_string(),
        ));
    }
    Ok(())
}

fn category_from_entity(model: categories::Model, subcategories: Vec<Subcategory>) -> Category {
    Category {
        id: model.id,
        name: model.name,
        slug: model.slug,
        description: model.description,
        image: model.image,
        featured: model.featured,
        order: model.sort_order,
        subcategories,
    }
}

fn subcategory_from_entity(model: subcategories::Model) -> Subcategory {
    Subcategory {
        id: model.id,
        name: model.name,
        slug: model.slug,
        description: model.description,
        image: model.image,
        category_id: model.category_id,
        order: model.sort_order,
    }
}
