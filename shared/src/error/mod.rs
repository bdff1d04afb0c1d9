//! Error model shared by the server and its clients
//!
//! Every failure reaches the client as an [`ErrorCode`] number, a message
//! and optional field details:
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::invalid_field("lines[0].quantity", "quantity is required");
//! assert_eq!(err.code, ErrorCode::ValidationFailed);
//!
//! let body = ApiResponse::<()>::from(err);
//! assert_eq!(body.code, Some(2));
//! ```

mod codes;
mod http;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError};
