//! Order Models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order lifecycle status
///
/// Transitions are unconstrained: any status may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Statuses whose totals count as revenue
    pub const ACCEPTED: [OrderStatus; 4] = [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_accepted(&self) -> bool {
        Self::ACCEPTED.contains(self)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub profile_id: i64,
    /// Sequential per store, starting at 1
    pub order_number: i64,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub notes: Option<String>,
    pub payment_method: Option<String>,
    pub change_amount: Option<f64>,
    pub created_at: i64,
    pub updated_at: i64,

    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub lines: Vec<OrderLine>,
}

/// Order line: a snapshot of one catalog item at order time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    /// Null once the catalog item is deleted
    pub product_id: Option<i64>,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub notes: Option<String>,

    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub ingredients: Vec<OrderLineIngredient>,
}

/// Ingredient customization attached to an order line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLineIngredient {
    pub id: i64,
    pub line_id: i64,
    pub ingredient_id: Option<i64>,
    pub ingredient_name: String,
    pub group_name: String,
    pub is_extra: bool,
    /// false when the customer removed the ingredient
    pub is_added: bool,
    pub price: f64,
}

/// One page of an order listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

// ── Requests ──

/// Order creation payload
///
/// Identifier fields are optional at the serde level so that a missing
/// value is reported as a field-level validation error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub notes: Option<String>,
    pub payment_method: Option<String>,
    pub change_amount: Option<f64>,
    /// Client-computed total
    pub total_amount: Option<f64>,
    #[serde(default, alias = "items")]
    pub lines: Vec<LineRequest>,
}

/// One requested order line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineRequest {
    pub product_id: Option<i64>,
    pub quantity: Option<i32>,
    /// Overrides the catalog price when present
    pub unit_price: Option<f64>,
    pub notes: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientSelection>,
}

/// Ingredient choice inside a line request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientSelection {
    pub ingredient_id: Option<i64>,
    pub group_name: Option<String>,
    pub is_extra: Option<bool>,
    pub is_added: Option<bool>,
    pub price: Option<f64>,
}

/// Status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("pending".parse::<OrderStatus>(), Ok(OrderStatus::Pending));
        assert_eq!(" Ready ".parse::<OrderStatus>(), Ok(OrderStatus::Ready));
        assert_eq!(
            "shipped".parse::<OrderStatus>(),
            Err(UnknownStatus("shipped".to_string()))
        );
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&OrderStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
        let status: OrderStatus = serde_json::from_str("\"delivered\"").unwrap();
        assert_eq!(status, OrderStatus::Delivered);
    }

    #[test]
    fn test_accepted_statuses() {
        assert!(!OrderStatus::Pending.is_accepted());
        assert!(OrderStatus::Confirmed.is_accepted());
        assert!(OrderStatus::Delivered.is_accepted());
        assert!(!OrderStatus::Cancelled.is_accepted());
    }

    #[test]
    fn test_items_alias() {
        let json = r#"{"customer_name":"Ana","items":[{"product_id":7,"quantity":2}]}"#;
        let req: CreateOrderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.lines.len(), 1);
        assert_eq!(req.lines[0].product_id, Some(7));
        assert!(req.lines[0].ingredients.is_empty());
    }
}
