//! Plans and store subscriptions

use chrono::NaiveDate;
use shared::models::{Plan, Subscription};
use sqlx::{Executor, Sqlite, SqlitePool};

pub async fn list_plans<'e, E>(executor: E) -> Result<Vec<Plan>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as("SELECT * FROM plans ORDER BY price, code")
        .fetch_all(executor)
        .await
}

pub async fn find_plan<'e, E>(executor: E, code: &str) -> Result<Option<Plan>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as("SELECT * FROM plans WHERE code = ?1")
        .bind(code)
        .fetch_optional(executor)
        .await
}

/// Build a subscription to `plan` starting on `start_date`
pub fn new_subscription(
    profile_id: i64,
    plan: &Plan,
    start_date: NaiveDate,
    is_active: bool,
    now: i64,
) -> Subscription {
    Subscription {
        id: shared::util::snowflake_id(),
        profile_id,
        plan_code: plan.code.clone(),
        start_date,
        end_date: start_date.checked_add_days(chrono::Days::new(plan.duration_days.max(0) as u64)),
        is_active,
        created_at: now,
    }
}

pub async fn insert<'e, E>(executor: E, sub: &Subscription) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO subscriptions (id, profile_id, plan_code, start_date, end_date, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(sub.id)
    .bind(sub.profile_id)
    .bind(&sub.plan_code)
    .bind(sub.start_date)
    .bind(sub.end_date)
    .bind(sub.is_active)
    .bind(sub.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Latest active subscription of a store
pub async fn current<'e, E>(executor: E, profile_id: i64) -> Result<Option<Subscription>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        "SELECT * FROM subscriptions
         WHERE profile_id = ?1 AND is_active = 1
         ORDER BY created_at DESC, id DESC
         LIMIT 1",
    )
    .bind(profile_id)
    .fetch_optional(executor)
    .await
}

pub async fn history<'e, E>(executor: E, profile_id: i64) -> Result<Vec<Subscription>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        "SELECT * FROM subscriptions WHERE profile_id = ?1 ORDER BY created_at DESC, id DESC",
    )
    .bind(profile_id)
    .fetch_all(executor)
    .await
}

/// Returns the updated subscription, or `None` when it does not exist
pub async fn set_active<'e, E>(
    executor: E,
    id: i64,
    is_active: bool,
) -> Result<Option<Subscription>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as("UPDATE subscriptions SET is_active = ?1 WHERE id = ?2 RETURNING *")
        .bind(is_active)
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Replace the active subscription of a store: older ones are deactivated
pub async fn assign(pool: &SqlitePool, sub: &Subscription) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    if sub.is_active {
        sqlx::query("UPDATE subscriptions SET is_active = 0 WHERE profile_id = ?1 AND is_active = 1")
            .bind(sub.profile_id)
            .execute(&mut *tx)
            .await?;
    }
    insert(&mut *tx, sub).await?;

    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_date_from_plan_duration() {
        let plan = Plan {
            code: "pro".into(),
            name: "Pro".into(),
            price: 99.9,
            duration_days: 30,
        };
        let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let sub = new_subscription(1, &plan, start, true, 0);
        assert_eq!(sub.end_date, NaiveDate::from_ymd_opt(2025, 2, 14));
        assert_eq!(sub.plan_code, "pro");
    }
}
