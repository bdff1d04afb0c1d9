//! Authentication: password hashing and JWT middleware for owners and admins

pub mod password;
pub mod tenant_auth;

pub use tenant_auth::{AdminIdentity, TenantIdentity};
