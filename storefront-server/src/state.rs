//! Application state for storefront-server

use chrono_tz::Tz;
use sqlx::SqlitePool;

use crate::BoxError;
use crate::config::Config;
use crate::db::DbService;
use crate::orders::ComposeOptions;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// JWT secret for owner and admin authentication
    pub jwt_secret: String,
    /// Order composer settings
    pub compose: ComposeOptions,
    /// Accept public orders while the store is closed
    pub accept_orders_when_closed: bool,
    /// Timezone given to new stores
    pub default_timezone: Tz,
}

impl AppState {
    /// Open the database and build the state from configuration
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self::with_pool(config, db.pool))
    }

    pub fn with_pool(config: &Config, pool: SqlitePool) -> Self {
        Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            compose: ComposeOptions {
                catalog_learning: config.catalog_learning,
                total_policy: config.order_total_policy,
            },
            accept_orders_when_closed: config.accept_orders_when_closed,
            default_timezone: config.default_timezone,
        }
    }

    /// Create or promote the administrator account named in the configuration
    pub async fn bootstrap_admin(&self, config: &Config) -> Result<(), BoxError> {
        let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
            return Ok(());
        };
        let email = email.trim().to_lowercase();
        let hash = crate::auth::password::hash_password(password)
            .map_err(|e| format!("Failed to hash admin password: {e}"))?;
        crate::db::accounts::ensure_admin(
            &self.pool,
            shared::util::snowflake_id(),
            &email,
            &hash,
            shared::util::now_millis(),
        )
        .await?;
        tracing::info!(email = %email, "Administrator account ready");
        Ok(())
    }
}
