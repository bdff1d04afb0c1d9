//! Data models
//!
//! Shared between the server and its web clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes; timestamps are Unix milliseconds.

pub mod catalog;
pub mod order;
pub mod profile;
pub mod report;
pub mod schedule;
pub mod subscription;

// Re-exports
pub use catalog::*;
pub use order::*;
pub use profile::*;
pub use report::*;
pub use schedule::*;
pub use subscription::*;
