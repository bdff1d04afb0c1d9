//! Shared types for the storefront platform
//!
//! Error types, response structures, domain models and utilities used by
//! the server and by anything talking to its API.

pub mod error;
pub mod models;
pub mod util;
