//! Dashboard and admin report models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::order::OrderStatus;

/// Compact order row for dashboard lists
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderSummary {
    pub id: i64,
    pub order_number: i64,
    pub customer_name: String,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub created_at: i64,
}

/// Owner dashboard for one period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub period: String,
    /// Inclusive local start date (absent for `all`)
    pub start_date: Option<NaiveDate>,
    /// Inclusive local end date (absent for `all`)
    pub end_date: Option<NaiveDate>,
    /// Sum of totals of accepted orders
    pub revenue: f64,
    pub order_count: i64,
    pub accepted_count: i64,
    pub average_ticket: f64,
    pub pending_count: i64,
    pub cancelled_count: i64,
    pub completed_count: i64,
    /// Fixed windows shown next to the selected period, same revenue rule
    pub today_orders: i64,
    pub today_revenue: f64,
    pub week_orders: i64,
    pub week_revenue: f64,
    pub month_orders: i64,
    pub month_revenue: f64,
    pub total_orders: i64,
    pub total_revenue: f64,
    pub recent_orders: Vec<OrderSummary>,
    pub page: u32,
    pub page_size: u32,
}

/// One point of a daily trend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub new_companies: i64,
    pub orders: i64,
}

/// Platform-wide metrics for the admin panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminMetrics {
    pub total_companies: i64,
    pub active_companies: i64,
    pub blocked_companies: i64,
    pub total_subscriptions: i64,
    pub active_subscriptions: i64,
    /// Sum of monthly plan prices over active subscriptions
    pub monthly_revenue: f64,
    pub total_orders: i64,
    pub trend: Vec<TrendPoint>,
}

/// Company row of the admin panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyOverview {
    pub profile_id: i64,
    pub business_name: String,
    pub slug: String,
    pub owner_email: String,
    pub is_active: bool,
    pub plan_code: Option<String>,
    pub days_remaining: Option<i64>,
    pub created_at: i64,
}
