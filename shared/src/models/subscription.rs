//! Subscription and Plan Models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Plan code assigned at signup
pub const FREE_PLAN: &str = "free";

/// Subscription plan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Plan {
    pub code: String,
    pub name: String,
    /// Monthly price
    pub price: f64,
    pub duration_days: i32,
}

/// Subscription of a store to a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Subscription {
    pub id: i64,
    pub profile_id: i64,
    pub plan_code: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: i64,
}

impl Subscription {
    /// Days left on the subscription as of `today`.
    ///
    /// `None` for open-ended subscriptions, `0` for inactive or expired ones.
    pub fn days_remaining(&self, today: NaiveDate) -> Option<i64> {
        let end = self.end_date?;
        if !self.is_active {
            return Some(0);
        }
        Some((end - today).num_days().max(0))
    }
}

/// Subscription with its derived fields, as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub subscription: Subscription,
    pub days_remaining: Option<i64>,
}

impl SubscriptionView {
    pub fn new(subscription: Subscription, today: NaiveDate) -> Self {
        let days_remaining = subscription.days_remaining(today);
        Self {
            subscription,
            days_remaining,
        }
    }
}

/// Admin payload to assign a plan to a store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignSubscription {
    pub plan_code: String,
    pub start_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}
