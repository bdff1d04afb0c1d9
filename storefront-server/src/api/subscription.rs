//! Subscription endpoints for store owners

use axum::{Extension, Json, extract::State};
use shared::error::{AppError, ErrorCode};
use shared::models::{Plan, SubscriptionView};

use crate::auth::TenantIdentity;
use crate::db;
use crate::state::AppState;

use super::ApiResult;

fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

/// GET /api/subscription
pub async fn current(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
) -> ApiResult<SubscriptionView> {
    let subscription = db::subscriptions::current(&state.pool, identity.profile_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::SubscriptionNotFound))?;
    Ok(Json(SubscriptionView::new(subscription, today())))
}

/// GET /api/subscription/history
pub async fn history(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
) -> ApiResult<Vec<SubscriptionView>> {
    let today = today();
    let history = db::subscriptions::history(&state.pool, identity.profile_id)
        .await?
        .into_iter()
        .map(|s| SubscriptionView::new(s, today))
        .collect();
    Ok(Json(history))
}

/// GET /api/plans
pub async fn list_plans(State(state): State<AppState>) -> ApiResult<Vec<Plan>> {
    Ok(Json(db::subscriptions::list_plans(&state.pool).await?))
}
