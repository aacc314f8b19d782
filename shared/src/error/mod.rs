//! Unified error system for the menu service
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Ticket errors
//! - 6xxx: Menu errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::menu_not_found("fr");
//! assert_eq!(err.code, ErrorCode::MenuNotFound);
//!
//! let err = AppError::required_field("status").with_detail("ticket", 4);
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(7));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
