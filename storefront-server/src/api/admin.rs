//! Platform administration: metrics and company management

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::Days;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{AdminMetrics, AssignSubscription, CompanyOverview, SubscriptionView, TrendPoint};
use shared::util::now_millis;

use crate::auth::AdminIdentity;
use crate::db;
use crate::orders::money::{to_decimal, to_f64};
use crate::period::DateRange;
use crate::state::AppState;

use super::ApiResult;

const TREND_DAYS: u64 = 7;

/// GET /api/admin/metrics
pub async fn metrics(State(state): State<AppState>) -> ApiResult<AdminMetrics> {
    let totals = db::reports::platform_totals(&state.pool).await?;

    let tz = state.default_timezone;
    let today = chrono::Utc::now().with_timezone(&tz).date_naive();
    let mut trend = Vec::with_capacity(TREND_DAYS as usize);
    for back in (0..TREND_DAYS).rev() {
        let Some(date) = today.checked_sub_days(Days::new(back)) else {
            continue;
        };
        let (from, to) = DateRange::day(date).to_millis(tz);
        let (new_companies, orders) = db::reports::activity_between(&state.pool, from, to).await?;
        trend.push(TrendPoint {
            date,
            new_companies,
            orders,
        });
    }

    Ok(Json(AdminMetrics {
        total_companies: totals.total_companies,
        active_companies: totals.active_companies,
        blocked_companies: totals.total_companies - totals.active_companies,
        total_subscriptions: totals.total_subscriptions,
        active_subscriptions: totals.active_subscriptions,
        monthly_revenue: to_f64(to_decimal(totals.monthly_revenue)),
        total_orders: totals.total_orders,
        trend,
    }))
}

/// GET /api/admin/companies
pub async fn list_companies(State(state): State<AppState>) -> ApiResult<Vec<CompanyOverview>> {
    let today = chrono::Utc::now().date_naive();
    let companies = db::reports::list_companies(&state.pool)
        .await?
        .into_iter()
        .map(|row| {
            let days_remaining = row.plan_end_date.map(|end| {
                if row.plan_is_active == Some(true) {
                    (end - today).num_days().max(0)
                } else {
                    0
                }
            });
            CompanyOverview {
                profile_id: row.profile_id,
                business_name: row.business_name,
                slug: row.slug,
                owner_email: row.owner_email,
                is_active: row.is_active,
                plan_code: row.plan_code,
                days_remaining,
                created_at: row.created_at,
            }
        })
        .collect();
    Ok(Json(companies))
}

#[derive(Debug, Deserialize)]
pub struct BlockRequest {
    pub blocked: bool,
}

/// PATCH /api/admin/companies/{id}/block
pub async fn set_blocked(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(profile_id): Path<i64>,
    Json(req): Json<BlockRequest>,
) -> ApiResult<bool> {
    let found =
        db::profiles::set_active(&state.pool, profile_id, !req.blocked, now_millis()).await?;
    if !found {
        return Err(AppError::new(ErrorCode::StoreNotFound).into());
    }
    tracing::info!(
        admin = %admin.email,
        profile_id,
        blocked = req.blocked,
        "Store block status changed"
    );
    Ok(Json(true))
}

/// DELETE /api/admin/companies/{id}
///
/// Removes the owner account and, by cascade, all store data.
pub async fn delete_company(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(profile_id): Path<i64>,
) -> ApiResult<bool> {
    let profile = db::profiles::find_by_id(&state.pool, profile_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::StoreNotFound))?;
    if profile.account_id == admin.account_id {
        return Err(AppError::with_message(
            ErrorCode::InvalidRequest,
            "Administrators cannot delete their own store",
        )
        .into());
    }

    db::accounts::delete(&state.pool, profile.account_id).await?;
    tracing::warn!(admin = %admin.email, profile_id, slug = %profile.slug, "Store deleted");
    Ok(Json(true))
}

/// POST /api/admin/companies/{id}/subscription
pub async fn assign_subscription(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(profile_id): Path<i64>,
    Json(req): Json<AssignSubscription>,
) -> ApiResult<SubscriptionView> {
    db::profiles::find_by_id(&state.pool, profile_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::StoreNotFound))?;
    let plan = db::subscriptions::find_plan(&state.pool, req.plan_code.trim())
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::PlanNotFound).with_detail("plan_code", req.plan_code.clone())
        })?;

    let today = chrono::Utc::now().date_naive();
    let subscription = db::subscriptions::new_subscription(
        profile_id,
        &plan,
        req.start_date.unwrap_or(today),
        req.is_active.unwrap_or(true),
        now_millis(),
    );
    db::subscriptions::assign(&state.pool, &subscription).await?;

    tracing::info!(
        admin = %admin.email,
        profile_id,
        plan = %plan.code,
        "Subscription assigned"
    );
    Ok(Json(SubscriptionView::new(subscription, today)))
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionToggle {
    pub is_active: bool,
}

/// PATCH /api/admin/subscriptions/{id}
pub async fn set_subscription_active(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<i64>,
    Json(req): Json<SubscriptionToggle>,
) -> ApiResult<SubscriptionView> {
    let subscription = db::subscriptions::set_active(&state.pool, id, req.is_active)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::SubscriptionNotFound))?;
    tracing::info!(
        admin = %admin.email,
        subscription_id = id,
        is_active = req.is_active,
        "Subscription toggled"
    );
    Ok(Json(SubscriptionView::new(
        subscription,
        chrono::Utc::now().date_naive(),
    )))
}
