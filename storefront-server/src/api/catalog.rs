//! Catalog management endpoints: categories, ingredient categories,
//! ingredients and products with their ingredient associations

use std::collections::HashSet;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AssociationInput, Category, CategoryCreate, CategoryUpdate, Ingredient, IngredientAssociation,
    IngredientCategory, IngredientCategoryCreate, IngredientCategoryUpdate, IngredientCreate,
    IngredientUpdate, Product, ProductCreate, ProductUpdate,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use crate::auth::TenantIdentity;
use crate::db;
use crate::error::{ServiceResult, map_unique};
use crate::orders::money::is_valid_price;
use crate::state::AppState;

use super::ApiResult;

fn required_name(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::invalid_field(field, format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

fn category_conflict() -> AppError {
    AppError::new(ErrorCode::CategoryNameExists)
}

// ── Categories ──

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
) -> ApiResult<Vec<Category>> {
    let categories = db::catalog::list_categories(&state.pool, identity.profile_id, false).await?;
    Ok(Json(categories))
}

async fn load_category(pool: &SqlitePool, profile_id: i64, id: i64) -> ServiceResult<Category> {
    db::catalog::find_category(pool, profile_id, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound).with_detail("id", id).into())
}

/// GET /api/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<Category> {
    Ok(Json(load_category(&state.pool, identity.profile_id, id).await?))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Json(payload): Json<CategoryCreate>,
) -> ApiResult<Category> {
    let category = Category {
        id: snowflake_id(),
        profile_id: identity.profile_id,
        name: required_name("name", &payload.name)?,
        emoji: payload.emoji,
        description: payload.description,
        sort_order: payload.sort_order.unwrap_or(0),
        is_active: payload.is_active.unwrap_or(true),
    };
    db::catalog::insert_category(&state.pool, &category)
        .await
        .map_err(|e| map_unique(e, category_conflict()))?;
    Ok(Json(category))
}

/// PUT /api/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> ApiResult<Category> {
    let mut category = load_category(&state.pool, identity.profile_id, id).await?;
    if let Some(name) = payload.name {
        category.name = required_name("name", &name)?;
    }
    if payload.emoji.is_some() {
        category.emoji = payload.emoji;
    }
    if payload.description.is_some() {
        category.description = payload.description;
    }
    if let Some(v) = payload.sort_order {
        category.sort_order = v;
    }
    if let Some(v) = payload.is_active {
        category.is_active = v;
    }
    db::catalog::update_category(&state.pool, &category)
        .await
        .map_err(|e| map_unique(e, category_conflict()))?;
    Ok(Json(category))
}

/// DELETE /api/categories/{id}
///
/// Also deletes the category's products.
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if !db::catalog::delete_category(&state.pool, identity.profile_id, id).await? {
        return Err(AppError::new(ErrorCode::CategoryNotFound).into());
    }
    Ok(Json(true))
}

// ── Ingredient categories ──

/// GET /api/ingredient-categories
pub async fn list_ingredient_categories(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
) -> ApiResult<Vec<IngredientCategory>> {
    let categories = db::catalog::list_ingredient_categories(&state.pool, identity.profile_id).await?;
    Ok(Json(categories))
}

async fn load_ingredient_category(
    pool: &SqlitePool,
    profile_id: i64,
    id: i64,
) -> ServiceResult<IngredientCategory> {
    db::catalog::find_ingredient_category(pool, profile_id, id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::IngredientCategoryNotFound)
                .with_detail("id", id)
                .into()
        })
}

/// GET /api/ingredient-categories/{id}
pub async fn get_ingredient_category(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<IngredientCategory> {
    Ok(Json(
        load_ingredient_category(&state.pool, identity.profile_id, id).await?,
    ))
}

/// POST /api/ingredient-categories
pub async fn create_ingredient_category(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Json(payload): Json<IngredientCategoryCreate>,
) -> ApiResult<IngredientCategory> {
    let category = IngredientCategory {
        id: snowflake_id(),
        profile_id: identity.profile_id,
        name: required_name("name", &payload.name)?,
        description: payload.description,
        is_extra: payload.is_extra.unwrap_or(false),
    };
    db::catalog::save_ingredient_category(&state.pool, &category).await?;
    Ok(Json(category))
}

/// PUT /api/ingredient-categories/{id}
pub async fn update_ingredient_category(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path(id): Path<i64>,
    Json(payload): Json<IngredientCategoryUpdate>,
) -> ApiResult<IngredientCategory> {
    let mut category = load_ingredient_category(&state.pool, identity.profile_id, id).await?;
    if let Some(name) = payload.name {
        category.name = required_name("name", &name)?;
    }
    if payload.description.is_some() {
        category.description = payload.description;
    }
    if let Some(v) = payload.is_extra {
        category.is_extra = v;
    }
    db::catalog::save_ingredient_category(&state.pool, &category).await?;
    Ok(Json(category))
}

/// DELETE /api/ingredient-categories/{id}; its ingredients become uncategorized
pub async fn delete_ingredient_category(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if !db::catalog::delete_ingredient_category(&state.pool, identity.profile_id, id).await? {
        return Err(AppError::new(ErrorCode::IngredientCategoryNotFound).into());
    }
    Ok(Json(true))
}

// ── Ingredients ──

/// GET /api/ingredients
pub async fn list_ingredients(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
) -> ApiResult<Vec<Ingredient>> {
    let ingredients = db::catalog::list_ingredients(&state.pool, identity.profile_id).await?;
    Ok(Json(ingredients))
}

async fn load_ingredient(pool: &SqlitePool, profile_id: i64, id: i64) -> ServiceResult<Ingredient> {
    db::catalog::find_ingredient(pool, profile_id, id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::IngredientNotFound)
                .with_detail("id", id)
                .into()
        })
}

fn check_price(field: &str, price: f64) -> Result<(), AppError> {
    if !is_valid_price(price) {
        return Err(AppError::invalid_field(
            field,
            format!("{field} must be a non-negative amount"),
        ));
    }
    Ok(())
}

/// GET /api/ingredients/{id}
pub async fn get_ingredient(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<Ingredient> {
    Ok(Json(load_ingredient(&state.pool, identity.profile_id, id).await?))
}

/// POST /api/ingredients
pub async fn create_ingredient(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Json(payload): Json<IngredientCreate>,
) -> ApiResult<Ingredient> {
    if let Some(category_id) = payload.category_id {
        load_ingredient_category(&state.pool, identity.profile_id, category_id).await?;
    }
    let price = payload.price.unwrap_or(0.0);
    check_price("price", price)?;

    let ingredient = Ingredient {
        id: snowflake_id(),
        profile_id: identity.profile_id,
        category_id: payload.category_id,
        name: required_name("name", &payload.name)?,
        description: payload.description,
        price,
        is_active: payload.is_active.unwrap_or(true),
        is_extra: payload.is_extra.unwrap_or(false),
    };
    db::catalog::save_ingredient(&state.pool, &ingredient).await?;
    Ok(Json(ingredient))
}

/// PUT /api/ingredients/{id}
pub async fn update_ingredient(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path(id): Path<i64>,
    Json(payload): Json<IngredientUpdate>,
) -> ApiResult<Ingredient> {
    let mut ingredient = load_ingredient(&state.pool, identity.profile_id, id).await?;
    if let Some(category_id) = payload.category_id {
        load_ingredient_category(&state.pool, identity.profile_id, category_id).await?;
        ingredient.category_id = Some(category_id);
    }
    if let Some(name) = payload.name {
        ingredient.name = required_name("name", &name)?;
    }
    if payload.description.is_some() {
        ingredient.description = payload.description;
    }
    if let Some(price) = payload.price {
        check_price("price", price)?;
        ingredient.price = price;
    }
    if let Some(v) = payload.is_active {
        ingredient.is_active = v;
    }
    if let Some(v) = payload.is_extra {
        ingredient.is_extra = v;
    }
    db::catalog::save_ingredient(&state.pool, &ingredient).await?;
    Ok(Json(ingredient))
}

/// DELETE /api/ingredients/{id}
pub async fn delete_ingredient(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if !db::catalog::delete_ingredient(&state.pool, identity.profile_id, id).await? {
        return Err(AppError::new(ErrorCode::IngredientNotFound).into());
    }
    Ok(Json(true))
}

// ── Products ──

/// Validate submitted associations and turn them into rows for `product_id`
async fn build_associations(
    pool: &SqlitePool,
    profile_id: i64,
    product_id: i64,
    inputs: Vec<AssociationInput>,
) -> ServiceResult<Vec<IngredientAssociation>> {
    let mut seen = HashSet::new();
    let mut associations = Vec::with_capacity(inputs.len());

    for (i, input) in inputs.into_iter().enumerate() {
        let group_name = input.group_name.trim().to_string();
        if group_name.is_empty() {
            return Err(AppError::invalid_field(
                format!("associations[{i}].group_name"),
                "group_name must not be empty",
            )
            .into());
        }
        let max_quantity = input.max_quantity.unwrap_or(1);
        if max_quantity < 1 {
            return Err(AppError::invalid_field(
                format!("associations[{i}].max_quantity"),
                "max_quantity must be at least 1",
            )
            .into());
        }
        if let Some(price) = input.price {
            check_price(&format!("associations[{i}].price"), price)?;
        }
        if db::catalog::find_ingredient(pool, profile_id, input.ingredient_id)
            .await?
            .is_none()
        {
            return Err(AppError::new(ErrorCode::IngredientNotFound)
                .with_detail("field", format!("associations[{i}].ingredient_id"))
                .with_detail("ingredient_id", input.ingredient_id)
                .into());
        }
        if !seen.insert((input.ingredient_id, group_name.to_lowercase())) {
            return Err(AppError::new(ErrorCode::AssociationDuplicate)
                .with_detail("ingredient_id", input.ingredient_id)
                .with_detail("group_name", group_name)
                .into());
        }

        associations.push(IngredientAssociation {
            id: snowflake_id(),
            product_id,
            ingredient_id: input.ingredient_id,
            group_name,
            is_required: input.is_required,
            max_quantity,
            price: input.price,
            is_extra: input.is_extra,
        });
    }
    Ok(associations)
}

async fn load_product(pool: &SqlitePool, profile_id: i64, id: i64) -> ServiceResult<Product> {
    let mut product = db::catalog::find_product(pool, profile_id, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound).with_detail("id", id))?;
    product.associations = db::catalog::list_associations(pool, id).await?;
    Ok(product)
}

fn check_product_price(price: f64) -> Result<(), AppError> {
    if !is_valid_price(price) {
        return Err(AppError::new(ErrorCode::ProductInvalidPrice).with_detail("field", "price"));
    }
    Ok(())
}

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
) -> ApiResult<Vec<Product>> {
    let mut products = db::catalog::list_products(&state.pool, identity.profile_id, false).await?;
    let mut associations =
        db::catalog::associations_by_product(&state.pool, identity.profile_id).await?;
    for product in &mut products {
        product.associations = associations.remove(&product.id).unwrap_or_default();
    }
    Ok(Json(products))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<Product> {
    Ok(Json(load_product(&state.pool, identity.profile_id, id).await?))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Json(payload): Json<ProductCreate>,
) -> ApiResult<Product> {
    let profile_id = identity.profile_id;
    let name = required_name("name", &payload.name)?;
    check_product_price(payload.price)?;
    load_category(&state.pool, profile_id, payload.category_id).await?;

    let id = snowflake_id();
    let associations = build_associations(&state.pool, profile_id, id, payload.associations).await?;
    let now = now_millis();
    let mut product = Product {
        id,
        profile_id,
        category_id: payload.category_id,
        name,
        description: payload.description,
        price: payload.price,
        is_active: payload.is_active.unwrap_or(true),
        created_at: now,
        updated_at: now,
        associations: Vec::new(),
    };
    db::catalog::save_product(&state.pool, &product, Some(associations.as_slice())).await?;
    product.associations = associations;

    tracing::info!(profile_id, product_id = id, "Product created");
    Ok(Json(product))
}

/// PUT /api/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> ApiResult<Product> {
    let profile_id = identity.profile_id;
    let mut product = load_product(&state.pool, profile_id, id).await?;

    if let Some(name) = payload.name {
        product.name = required_name("name", &name)?;
    }
    if let Some(category_id) = payload.category_id {
        load_category(&state.pool, profile_id, category_id).await?;
        product.category_id = category_id;
    }
    if payload.description.is_some() {
        product.description = payload.description;
    }
    if let Some(price) = payload.price {
        check_product_price(price)?;
        product.price = price;
    }
    if let Some(v) = payload.is_active {
        product.is_active = v;
    }

    let associations = match payload.associations {
        Some(inputs) => Some(build_associations(&state.pool, profile_id, id, inputs).await?),
        None => None,
    };

    product.updated_at = now_millis();
    db::catalog::save_product(&state.pool, &product, associations.as_deref()).await?;
    if let Some(associations) = associations {
        product.associations = associations;
    }
    Ok(Json(product))
}

/// DELETE /api/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if !db::catalog::delete_product(&state.pool, identity.profile_id, id).await? {
        return Err(AppError::new(ErrorCode::ProductNotFound).into());
    }
    Ok(Json(true))
}
