//! Order placement
//!
//! [`compose::compose_order`] turns a customer request into a persisted
//! order: numbered, snapshotted and with every ingredient resolved to a group.

pub mod compose;
pub mod money;

use std::fmt;
use std::str::FromStr;

pub use compose::{compose_order, validate_request};

/// How a client-supplied order total is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TotalPolicy {
    /// Store the client total; log a warning when it disagrees
    #[default]
    Trust,
    /// Reject orders whose client total disagrees with the computed one
    Verify,
}

impl FromStr for TotalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trust" => Ok(Self::Trust),
            "verify" => Ok(Self::Verify),
            other => Err(format!("ORDER_TOTAL_POLICY: expected trust|verify, got '{other}'")),
        }
    }
}

impl fmt::Display for TotalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trust => f.write_str("trust"),
            Self::Verify => f.write_str("verify"),
        }
    }
}

/// Knobs of the order composer
#[derive(Debug, Clone, Copy)]
pub struct ComposeOptions {
    /// Create and promote ingredient associations while placing orders
    pub catalog_learning: bool,
    pub total_policy: TotalPolicy,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            catalog_learning: true,
            total_policy: TotalPolicy::Trust,
        }
    }
}
