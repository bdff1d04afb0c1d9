//! Business Profile Model

use serde::{Deserialize, Serialize};

/// Default IANA timezone for new stores
pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";

/// Business profile entity (one per tenant)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BusinessProfile {
    pub id: i64,
    pub account_id: i64,
    pub business_name: String,
    /// Unique URL-safe identifier used by the public storefront
    pub slug: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    /// IANA timezone name, used to evaluate opening hours
    pub timezone: String,
    /// Manual open/closed toggle, overrides the schedule when false
    pub is_open: bool,
    pub delivery_available: bool,
    pub delivery_fee: f64,
    pub minimum_order_value: f64,
    pub tax_rate: f64,
    #[cfg_attr(feature = "db", sqlx(json))]
    #[serde(default)]
    pub payment_methods: Vec<String>,
    /// Cleared by an administrator to block the store
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Update profile payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessProfileUpdate {
    pub business_name: Option<String>,
    pub slug: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub timezone: Option<String>,
    pub is_open: Option<bool>,
    pub delivery_available: Option<bool>,
    pub delivery_fee: Option<f64>,
    pub minimum_order_value: Option<f64>,
    pub tax_rate: Option<f64>,
    pub payment_methods: Option<Vec<String>>,
}

/// Public view of a profile, as shown on the storefront
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontProfile {
    pub business_name: String,
    pub slug: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub timezone: String,
    pub delivery_available: bool,
    pub delivery_fee: f64,
    pub minimum_order_value: f64,
    pub payment_methods: Vec<String>,
}

impl From<&BusinessProfile> for StorefrontProfile {
    fn from(p: &BusinessProfile) -> Self {
        Self {
            business_name: p.business_name.clone(),
            slug: p.slug.clone(),
            phone: p.phone.clone(),
            address: p.address.clone(),
            timezone: p.timezone.clone(),
            delivery_available: p.delivery_available,
            delivery_fee: p.delivery_fee,
            minimum_order_value: p.minimum_order_value,
            payment_methods: p.payment_methods.clone(),
        }
    }
}

/// Everything a customer needs to browse a store and place an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontView {
    pub profile: StorefrontProfile,
    pub schedule: Vec<super::schedule::ScheduleEntry>,
    pub menu: Vec<super::catalog::MenuSection>,
    /// Manual toggle and schedule both say open
    pub is_open_now: bool,
}
