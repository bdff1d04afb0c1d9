//! Public storefront: browsing and order placement by slug

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    BusinessProfile, CreateOrderRequest, MenuSection, Order, ScheduleEntry, StorefrontView,
};

use crate::db;
use crate::hours;
use crate::orders::{compose_order, validate_request};
use crate::state::AppState;

use super::ApiResult;

/// Active store for `slug`; unknown and blocked stores are both not found
async fn active_store(state: &AppState, slug: &str) -> Result<BusinessProfile, crate::error::ServiceError> {
    db::profiles::find_by_slug(&state.pool, slug)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| {
            AppError::new(ErrorCode::StoreNotFound)
                .with_detail("slug", slug.to_string())
                .into()
        })
}

/// Manual toggle and weekly schedule, evaluated now in the store's timezone
fn open_now(state: &AppState, profile: &BusinessProfile, schedule: &[ScheduleEntry]) -> bool {
    let tz = hours::parse_timezone(&profile.timezone).unwrap_or(state.default_timezone);
    profile.is_open && hours::is_open(schedule, chrono::Utc::now(), tz)
}

/// GET /api/public/stores/{slug}
pub async fn storefront(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<StorefrontView> {
    let profile = active_store(&state, &slug).await?;
    let schedule = db::schedule::list(&state.pool, profile.id).await?;

    let categories = db::catalog::list_categories(&state.pool, profile.id, true).await?;
    let products = db::catalog::list_products(&state.pool, profile.id, true).await?;
    let mut associations = db::catalog::associations_by_product(&state.pool, profile.id).await?;

    let mut menu: Vec<MenuSection> = categories
        .into_iter()
        .map(|category| MenuSection {
            category,
            products: Vec::new(),
        })
        .collect();
    for mut product in products {
        product.associations = associations.remove(&product.id).unwrap_or_default();
        if let Some(section) = menu.iter_mut().find(|s| s.category.id == product.category_id) {
            section.products.push(product);
        }
    }

    let is_open_now = open_now(&state, &profile, &schedule);
    Ok(Json(StorefrontView {
        profile: (&profile).into(),
        schedule,
        menu,
        is_open_now,
    }))
}

/// POST /api/public/stores/{slug}/orders
pub async fn place_order(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(request): Json<CreateOrderRequest>,
) -> ApiResult<Order> {
    let profile = active_store(&state, &slug).await?;

    if !state.accept_orders_when_closed {
        let schedule = db::schedule::list(&state.pool, profile.id).await?;
        if !open_now(&state, &profile, &schedule) {
            return Err(AppError::new(ErrorCode::StoreClosed)
                .with_detail("slug", slug)
                .into());
        }
    }

    let validated = validate_request(request)?;
    let order = compose_order(&state.pool, profile.id, validated, state.compose).await?;
    Ok(Json(order))
}
