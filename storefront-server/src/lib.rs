//! storefront-server: multi-tenant ordering platform for small food businesses
//!
//! - Owner API (JWT): profile, weekly schedule, catalog, orders, dashboard
//! - Public storefront by slug: menu, opening status, order placement
//! - Admin API: platform metrics, store blocking, subscriptions

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod hours;
pub mod orders;
pub mod period;
pub mod state;

pub use config::Config;
pub use state::AppState;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Build the HTTP application for `state`
pub fn app(state: AppState) -> axum::Router {
    api::create_router(state)
}
