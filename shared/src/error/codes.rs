//! Numeric error codes returned to the web frontends
//!
//! Ranges: 0xxx general, 1xxx auth, 2xxx permission, 3xxx store (profile,
//! schedule, subscription), 4xxx order, 6xxx catalog, 9xxx system.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code carried in every error body as a plain number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    Success = 0,
    ValidationFailed = 2,
    InvalidRequest = 5,

    NotAuthenticated = 1001,
    InvalidCredentials = 1002,
    TokenExpired = 1003,
    TokenInvalid = 1004,
    EmailAlreadyRegistered = 1008,
    PasswordTooShort = 1009,

    AdminRequired = 2003,

    /// Unknown slug or id, or a store blocked by an administrator
    StoreNotFound = 3001,
    /// Store is not accepting orders right now
    StoreClosed = 3003,
    SlugInvalid = 3004,
    SlugTaken = 3005,
    /// Timezone is not a known IANA name
    TimezoneInvalid = 3006,
    ScheduleInvalid = 3007,
    /// Two schedule entries share the same day and holiday flag
    ScheduleDuplicateDay = 3008,
    PlanNotFound = 3101,
    SubscriptionNotFound = 3102,

    OrderNotFound = 4001,
    OrderEmpty = 4007,
    InvalidOrderStatus = 4008,
    /// Client total disagrees with the computed total
    OrderTotalMismatch = 4009,
    /// Product referenced by an order line does not exist for the store
    ItemNotFound = 4010,

    ProductNotFound = 6001,
    ProductInvalidPrice = 6002,
    CategoryNotFound = 6101,
    CategoryNameExists = 6103,
    IngredientNotFound = 6201,
    /// Same ingredient listed twice in one group
    AssociationDuplicate = 6202,
    IngredientCategoryNotFound = 6301,

    InternalError = 9001,
    DatabaseError = 9002,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 33] = [
        Self::Success,
        Self::ValidationFailed,
        Self::InvalidRequest,
        Self::NotAuthenticated,
        Self::InvalidCredentials,
        Self::TokenExpired,
        Self::TokenInvalid,
        Self::EmailAlreadyRegistered,
        Self::PasswordTooShort,
        Self::AdminRequired,
        Self::StoreNotFound,
        Self::StoreClosed,
        Self::SlugInvalid,
        Self::SlugTaken,
        Self::TimezoneInvalid,
        Self::ScheduleInvalid,
        Self::ScheduleDuplicateDay,
        Self::PlanNotFound,
        Self::SubscriptionNotFound,
        Self::OrderNotFound,
        Self::OrderEmpty,
        Self::InvalidOrderStatus,
        Self::OrderTotalMismatch,
        Self::ItemNotFound,
        Self::ProductNotFound,
        Self::ProductInvalidPrice,
        Self::CategoryNotFound,
        Self::CategoryNameExists,
        Self::IngredientNotFound,
        Self::AssociationDuplicate,
        Self::IngredientCategoryNotFound,
        Self::InternalError,
        Self::DatabaseError,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Infrastructure failure rather than a client mistake
    pub const fn is_system(&self) -> bool {
        self.code() >= 9000
    }

    /// Message used when an error carries no custom one
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::ValidationFailed => "Validation failed",
            Self::InvalidRequest => "Invalid request",

            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid email or password",
            Self::TokenExpired => "Session expired, please log in again",
            Self::TokenInvalid => "Invalid authentication token",
            Self::EmailAlreadyRegistered => "Email already registered",
            Self::PasswordTooShort => "Password must be at least 8 characters",

            Self::AdminRequired => "Administrator access required",

            Self::StoreNotFound => "Store not found",
            Self::StoreClosed => "Store is closed",
            Self::SlugInvalid => "Slug must contain only lowercase letters, digits and hyphens",
            Self::SlugTaken => "Slug is already in use",
            Self::TimezoneInvalid => "Unknown timezone",
            Self::ScheduleInvalid => "Invalid schedule entry",
            Self::ScheduleDuplicateDay => "Duplicate schedule entry for day",
            Self::PlanNotFound => "Plan not found",
            Self::SubscriptionNotFound => "Subscription not found",

            Self::OrderNotFound => "Order not found",
            Self::OrderEmpty => "Order has no items",
            Self::InvalidOrderStatus => "Invalid order status",
            Self::OrderTotalMismatch => "Order total does not match its items",
            Self::ItemNotFound => "Item not found in this store's catalog",

            Self::ProductNotFound => "Product not found",
            Self::ProductInvalidPrice => "Product has invalid price",
            Self::CategoryNotFound => "Category not found",
            Self::CategoryNameExists => "Category name already exists",
            Self::IngredientNotFound => "Ingredient not found",
            Self::AssociationDuplicate => "Ingredient listed twice in the same group",
            Self::IngredientCategoryNotFound => "Ingredient category not found",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A number that is not one of the known [`ErrorCode`]s
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|code| code.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}
