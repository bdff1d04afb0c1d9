//! Aggregate queries for the owner dashboard and the admin panel

use chrono::NaiveDate;
use shared::models::OrderSummary;
use sqlx::{Executor, Sqlite};

/// Order aggregates of one store over a time window
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct OrderTotals {
    pub order_count: i64,
    pub accepted_count: i64,
    pub revenue: f64,
    pub pending_count: i64,
    pub cancelled_count: i64,
    pub completed_count: i64,
}

/// `from`/`to` are Unix millis, `to` exclusive; `None` leaves the side open
pub async fn order_totals<'e, E>(
    executor: E,
    profile_id: i64,
    from: Option<i64>,
    to: Option<i64>,
) -> Result<OrderTotals, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        "SELECT
            COUNT(*) AS order_count,
            COALESCE(SUM(CASE WHEN status IN ('confirmed', 'preparing', 'ready', 'delivered') THEN 1 ELSE 0 END), 0) AS accepted_count,
            TOTAL(CASE WHEN status IN ('confirmed', 'preparing', 'ready', 'delivered') THEN total_amount ELSE 0.0 END) AS revenue,
            COALESCE(SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END), 0) AS pending_count,
            COALESCE(SUM(CASE WHEN status = 'cancelled' THEN 1 ELSE 0 END), 0) AS cancelled_count,
            COALESCE(SUM(CASE WHEN status = 'delivered' THEN 1 ELSE 0 END), 0) AS completed_count
         FROM orders
         WHERE profile_id = ?1
           AND (?2 IS NULL OR created_at >= ?2)
           AND (?3 IS NULL OR created_at < ?3)",
    )
    .bind(profile_id)
    .bind(from)
    .bind(to)
    .fetch_one(executor)
    .await
}

pub async fn recent_orders<'e, E>(
    executor: E,
    profile_id: i64,
    from: Option<i64>,
    to: Option<i64>,
    limit: i64,
    offset: i64,
) -> Result<Vec<OrderSummary>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        "SELECT id, order_number, customer_name, status, total_amount, created_at
         FROM orders
         WHERE profile_id = ?1
           AND (?2 IS NULL OR created_at >= ?2)
           AND (?3 IS NULL OR created_at < ?3)
         ORDER BY created_at DESC, order_number DESC
         LIMIT ?4 OFFSET ?5",
    )
    .bind(profile_id)
    .bind(from)
    .bind(to)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
}

// ── Admin ──

#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct PlatformTotals {
    pub total_companies: i64,
    pub active_companies: i64,
    pub total_subscriptions: i64,
    pub active_subscriptions: i64,
    pub monthly_revenue: f64,
    pub total_orders: i64,
}

pub async fn platform_totals<'e, E>(executor: E) -> Result<PlatformTotals, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        "SELECT
            (SELECT COUNT(*) FROM business_profiles) AS total_companies,
            (SELECT COUNT(*) FROM business_profiles WHERE is_active = 1) AS active_companies,
            (SELECT COUNT(*) FROM subscriptions) AS total_subscriptions,
            (SELECT COUNT(*) FROM subscriptions WHERE is_active = 1) AS active_subscriptions,
            (SELECT TOTAL(p.price) FROM subscriptions s JOIN plans p ON p.code = s.plan_code
              WHERE s.is_active = 1) AS monthly_revenue,
            (SELECT COUNT(*) FROM orders) AS total_orders",
    )
    .fetch_one(executor)
    .await
}

/// New stores and orders created in `[from, to)`
pub async fn activity_between<'e, E>(
    executor: E,
    from: i64,
    to: i64,
) -> Result<(i64, i64), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        "SELECT
            (SELECT COUNT(*) FROM business_profiles WHERE created_at >= ?1 AND created_at < ?2),
            (SELECT COUNT(*) FROM orders WHERE created_at >= ?1 AND created_at < ?2)",
    )
    .bind(from)
    .bind(to)
    .fetch_one(executor)
    .await
}

/// Store row of the admin company list, with its current plan
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompanyRow {
    pub profile_id: i64,
    pub business_name: String,
    pub slug: String,
    pub owner_email: String,
    pub is_active: bool,
    pub created_at: i64,
    pub plan_code: Option<String>,
    pub plan_is_active: Option<bool>,
    pub plan_end_date: Option<NaiveDate>,
}

pub async fn list_companies<'e, E>(executor: E) -> Result<Vec<CompanyRow>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        "SELECT
            p.id AS profile_id, p.business_name, p.slug, a.email AS owner_email,
            p.is_active, p.created_at,
            s.plan_code, s.is_active AS plan_is_active, s.end_date AS plan_end_date
         FROM business_profiles p
         JOIN accounts a ON a.id = p.account_id
         LEFT JOIN subscriptions s ON s.id = (
            SELECT s2.id FROM subscriptions s2
            WHERE s2.profile_id = p.id AND s2.is_active = 1
            ORDER BY s2.created_at DESC, s2.id DESC
            LIMIT 1
         )
         ORDER BY p.created_at DESC",
    )
    .fetch_all(executor)
    .await
}
