//! Order endpoints for store owners

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{CreateOrderRequest, Order, OrderPage, OrderStatus, UpdateStatusRequest};
use shared::util::now_millis;

use crate::auth::TenantIdentity;
use crate::db;
use crate::db::orders::OrderFilter;
use crate::orders::{compose_order, validate_request};
use crate::period::DateRange;
use crate::state::AppState;

use super::profile::load_profile;
use super::{ApiResult, page_offset, paging};

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// GET /api/orders
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<String>,
    /// Only orders placed today, in the store's timezone
    #[serde(default)]
    pub today: bool,
    /// Only orders placed in the last 24 hours
    #[serde(default)]
    pub recent: bool,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

fn parse_status(value: &str) -> Result<OrderStatus, AppError> {
    value.parse().map_err(|_| {
        AppError::with_message(
            ErrorCode::InvalidOrderStatus,
            format!("unknown order status '{value}'"),
        )
        .with_detail("field", "status")
        .with_detail(
            "allowed",
            OrderStatus::ALL.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
        )
    })
}

pub async fn list_orders(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Query(query): Query<OrdersQuery>,
) -> ApiResult<OrderPage> {
    let profile_id = identity.profile_id;
    let (page, page_size) = paging(query.page, query.page_size);

    let mut filter = OrderFilter {
        status: query.status.as_deref().map(parse_status).transpose()?,
        limit: page_size as i64,
        offset: page_offset(page, page_size),
        ..Default::default()
    };

    let now = now_millis();
    if query.today {
        let profile = load_profile(&state.pool, profile_id).await?;
        let tz = crate::hours::parse_timezone(&profile.timezone).unwrap_or(state.default_timezone);
        let today = chrono::Utc::now().with_timezone(&tz).date_naive();
        let (from, to) = DateRange::day(today).to_millis(tz);
        filter.from = Some(from);
        filter.to = Some(to);
    }
    if query.recent {
        let since = now - DAY_MILLIS;
        filter.from = Some(filter.from.map_or(since, |from| from.max(since)));
    }

    let total = db::orders::count_orders(&state.pool, profile_id, &filter).await?;
    let mut conn = state.pool.acquire().await?;
    let orders = db::orders::list_orders(&mut conn, profile_id, &filter).await?;

    Ok(Json(OrderPage {
        orders,
        total,
        page,
        page_size,
    }))
}

/// POST /api/orders, for orders entered by the store itself
pub async fn create_order(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Json(request): Json<CreateOrderRequest>,
) -> ApiResult<Order> {
    let validated = validate_request(request)?;
    let order = compose_order(&state.pool, identity.profile_id, validated, state.compose).await?;
    Ok(Json(order))
}

/// GET /api/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<Order> {
    let mut conn = state.pool.acquire().await?;
    let order = db::orders::fetch_order_detail(&mut conn, identity.profile_id, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("id", id))?;
    Ok(Json(order))
}

/// PATCH /api/orders/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Order> {
    let status = parse_status(&req.status)?;
    let updated =
        db::orders::update_status(&state.pool, identity.profile_id, id, status, now_millis())
            .await?;
    if !updated {
        return Err(AppError::new(ErrorCode::OrderNotFound).with_detail("id", id).into());
    }

    tracing::info!(profile_id = identity.profile_id, order_id = id, %status, "Order status changed");

    let mut conn = state.pool.acquire().await?;
    let order = db::orders::fetch_order_detail(&mut conn, identity.profile_id, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("id", id))?;
    Ok(Json(order))
}

/// DELETE /api/orders/{id}
pub async fn delete_order(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if !db::orders::delete_order(&state.pool, identity.profile_id, id).await? {
        return Err(AppError::new(ErrorCode::OrderNotFound).with_detail("id", id).into());
    }
    tracing::info!(profile_id = identity.profile_id, order_id = id, "Order deleted");
    Ok(Json(true))
}
