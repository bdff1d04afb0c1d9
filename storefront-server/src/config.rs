//! Server configuration

use chrono_tz::Tz;

use crate::BoxError;
use crate::orders::TotalPolicy;

/// Server configuration, loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file path
    pub database_path: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT secret for tenant authentication
    pub jwt_secret: String,
    /// Timezone given to new stores
    pub default_timezone: Tz,
    /// Let order placement create and promote ingredient associations
    pub catalog_learning: bool,
    /// How a client-supplied order total is checked
    pub order_total_policy: TotalPolicy,
    /// Accept public orders while the schedule says the store is closed
    pub accept_orders_when_closed: bool,
    /// Emit JSON log lines instead of the human-readable format
    pub json_logs: bool,
    /// Administrator account created at startup when both are set
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn flag(name: &str, default: bool) -> Result<bool, BoxError> {
        match std::env::var(name) {
            Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                other => Err(format!("{name}: expected a boolean, got '{other}'").into()),
            },
            Err(_) => Ok(default),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let default_timezone = std::env::var("DEFAULT_TIMEZONE")
            .unwrap_or_else(|_| shared::models::DEFAULT_TIMEZONE.into());
        let default_timezone: Tz = default_timezone
            .parse()
            .map_err(|_| format!("DEFAULT_TIMEZONE: unknown timezone '{default_timezone}'"))?;

        let order_total_policy = match std::env::var("ORDER_TOTAL_POLICY") {
            Ok(v) => v.parse()?,
            Err(_) => TotalPolicy::Trust,
        };

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "storefront.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: environment.clone(),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            default_timezone,
            catalog_learning: Self::flag("CATALOG_LEARNING", true)?,
            order_total_policy,
            accept_orders_when_closed: Self::flag("ACCEPT_ORDERS_WHEN_CLOSED", false)?,
            json_logs: std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")),
            admin_email: std::env::var("ADMIN_EMAIL").ok().filter(|s| !s.is_empty()),
            admin_password: std::env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty()),
        })
    }

    /// Configuration for tests and local tooling
    pub fn for_database(database_path: impl Into<String>) -> Self {
        Self {
            database_path: database_path.into(),
            http_port: 0,
            environment: "development".into(),
            jwt_secret: "test-secret".into(),
            default_timezone: chrono_tz::America::Sao_Paulo,
            catalog_learning: true,
            order_total_policy: TotalPolicy::Trust,
            accept_orders_when_closed: false,
            json_logs: false,
            admin_email: None,
            admin_password: None,
        }
    }
}
