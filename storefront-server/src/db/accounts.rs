use sqlx::{Executor, Sqlite};

#[derive(sqlx::FromRow)]
#[allow(dead_code)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub hashed_password: String,
    pub is_admin: bool,
    pub created_at: i64,
}

pub async fn create<'e, E>(
    executor: E,
    id: i64,
    email: &str,
    hashed_password: &str,
    is_admin: bool,
    now: i64,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO accounts (id, email, hashed_password, is_admin, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(email)
    .bind(hashed_password)
    .bind(is_admin)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<Account>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as("SELECT * FROM accounts WHERE email = ?1")
        .bind(email)
        .fetch_optional(executor)
        .await
}

pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM accounts WHERE id = ?1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Create the administrator account, or grant admin to an existing one
pub async fn ensure_admin<'e, E>(
    executor: E,
    id: i64,
    email: &str,
    hashed_password: &str,
    now: i64,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO accounts (id, email, hashed_password, is_admin, created_at)
         VALUES (?1, ?2, ?3, 1, ?4)
         ON CONFLICT (email) DO UPDATE SET is_admin = 1",
    )
    .bind(id)
    .bind(email)
    .bind(hashed_password)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}
