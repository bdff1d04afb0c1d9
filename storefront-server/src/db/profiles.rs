use shared::models::BusinessProfile;
use sqlx::types::Json;
use sqlx::{Executor, Sqlite};

pub async fn create<'e, E>(executor: E, profile: &BusinessProfile) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO business_profiles (
            id, account_id, business_name, slug, phone, address, email, timezone,
            is_open, delivery_available, delivery_fee, minimum_order_value, tax_rate,
            payment_methods, is_active, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
    )
    .bind(profile.id)
    .bind(profile.account_id)
    .bind(&profile.business_name)
    .bind(&profile.slug)
    .bind(&profile.phone)
    .bind(&profile.address)
    .bind(&profile.email)
    .bind(&profile.timezone)
    .bind(profile.is_open)
    .bind(profile.delivery_available)
    .bind(profile.delivery_fee)
    .bind(profile.minimum_order_value)
    .bind(profile.tax_rate)
    .bind(Json(&profile.payment_methods))
    .bind(profile.is_active)
    .bind(profile.created_at)
    .bind(profile.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<BusinessProfile>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as("SELECT * FROM business_profiles WHERE id = ?1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn find_by_account<'e, E>(
    executor: E,
    account_id: i64,
) -> Result<Option<BusinessProfile>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as("SELECT * FROM business_profiles WHERE account_id = ?1")
        .bind(account_id)
        .fetch_optional(executor)
        .await
}

pub async fn find_by_slug<'e, E>(
    executor: E,
    slug: &str,
) -> Result<Option<BusinessProfile>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as("SELECT * FROM business_profiles WHERE slug = ?1")
        .bind(slug)
        .fetch_optional(executor)
        .await
}

/// True when another profile already uses `slug`
pub async fn slug_taken<'e, E>(executor: E, slug: &str, except_id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM business_profiles WHERE slug = ?1 AND id != ?2 LIMIT 1")
            .bind(slug)
            .bind(except_id)
            .fetch_optional(executor)
            .await?;
    Ok(row.is_some())
}

/// Write every editable column of `profile`
pub async fn update<'e, E>(executor: E, profile: &BusinessProfile) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "UPDATE business_profiles SET
            business_name = ?1, slug = ?2, phone = ?3, address = ?4, email = ?5,
            timezone = ?6, is_open = ?7, delivery_available = ?8, delivery_fee = ?9,
            minimum_order_value = ?10, tax_rate = ?11, payment_methods = ?12,
            updated_at = ?13
         WHERE id = ?14",
    )
    .bind(&profile.business_name)
    .bind(&profile.slug)
    .bind(&profile.phone)
    .bind(&profile.address)
    .bind(&profile.email)
    .bind(&profile.timezone)
    .bind(profile.is_open)
    .bind(profile.delivery_available)
    .bind(profile.delivery_fee)
    .bind(profile.minimum_order_value)
    .bind(profile.tax_rate)
    .bind(Json(&profile.payment_methods))
    .bind(profile.updated_at)
    .bind(profile.id)
    .execute(executor)
    .await?;
    Ok(())
}

/// Block or unblock a store. Returns false when the profile does not exist.
pub async fn set_active<'e, E>(
    executor: E,
    id: i64,
    is_active: bool,
    now: i64,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result =
        sqlx::query("UPDATE business_profiles SET is_active = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(is_active)
            .bind(now)
            .bind(id)
            .execute(executor)
            .await?;
    Ok(result.rows_affected() > 0)
}
