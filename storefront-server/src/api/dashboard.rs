//! Owner dashboard

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Deserialize;
use shared::models::DashboardSummary;

use crate::auth::TenantIdentity;
use crate::db;
use crate::db::reports::OrderTotals;
use crate::error::ServiceError;
use crate::hours::parse_timezone;
use crate::orders::money::{to_decimal, to_f64};
use crate::period::{self, DateRange, Period};
use crate::state::AppState;

use super::profile::load_profile;
use super::{ApiResult, page_offset, paging};

/// GET /api/dashboard/summary
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    pub period: Option<String>,
    #[serde(alias = "start_date")]
    pub start: Option<NaiveDate>,
    #[serde(alias = "end_date")]
    pub end: Option<NaiveDate>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

pub async fn summary(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<DashboardSummary> {
    let period: Period = query.period.as_deref().unwrap_or("today").parse()?;
    let (page, page_size) = paging(query.page, query.page_size);

    let profile = load_profile(&state.pool, identity.profile_id).await?;
    let tz = parse_timezone(&profile.timezone).unwrap_or(state.default_timezone);
    let today = chrono::Utc::now().with_timezone(&tz).date_naive();

    let range = period::resolve(period, today, query.start, query.end)?;
    let (from, to) = bounds(range, tz);

    let totals = db::reports::order_totals(&state.pool, profile.id, from, to).await?;
    let today_totals = window_totals(&state, profile.id, Period::Today, today, tz).await?;
    let week_totals = window_totals(&state, profile.id, Period::Week, today, tz).await?;
    let month_totals = window_totals(&state, profile.id, Period::Month, today, tz).await?;
    let all_totals = db::reports::order_totals(&state.pool, profile.id, None, None).await?;
    let recent_orders = db::reports::recent_orders(
        &state.pool,
        profile.id,
        from,
        to,
        page_size as i64,
        page_offset(page, page_size),
    )
    .await?;

    let revenue = to_decimal(totals.revenue);
    let average_ticket = if totals.accepted_count > 0 {
        to_f64(revenue / rust_decimal::Decimal::from(totals.accepted_count))
    } else {
        0.0
    };

    let money = |value: f64| to_f64(to_decimal(value));
    Ok(Json(DashboardSummary {
        period: period.as_str().to_string(),
        start_date: range.map(|r| r.start),
        end_date: range.map(|r| r.end),
        revenue: to_f64(revenue),
        order_count: totals.order_count,
        accepted_count: totals.accepted_count,
        average_ticket,
        pending_count: totals.pending_count,
        cancelled_count: totals.cancelled_count,
        completed_count: totals.completed_count,
        today_orders: today_totals.order_count,
        today_revenue: money(today_totals.revenue),
        week_orders: week_totals.order_count,
        week_revenue: money(week_totals.revenue),
        month_orders: month_totals.order_count,
        month_revenue: money(month_totals.revenue),
        total_orders: all_totals.order_count,
        total_revenue: money(all_totals.revenue),
        recent_orders,
        page,
        page_size,
    }))
}

fn bounds(range: Option<DateRange>, tz: Tz) -> (Option<i64>, Option<i64>) {
    match range {
        Some(r) => {
            let (from, to) = r.to_millis(tz);
            (Some(from), Some(to))
        }
        None => (None, None),
    }
}

async fn window_totals(
    state: &AppState,
    profile_id: i64,
    window: Period,
    today: NaiveDate,
    tz: Tz,
) -> Result<OrderTotals, ServiceError> {
    let (from, to) = bounds(period::resolve(window, today, None, None)?, tz);
    Ok(db::reports::order_totals(&state.pool, profile_id, from, to).await?)
}
