//! Error types and API response structures

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// Every failure that reaches an HTTP caller is turned into one of these.
/// The message is safe to show to the editor; internal causes stay in logs.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field names, language codes, ...)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// A required input field was absent
    pub fn required_field(field: impl Into<String>) -> Self {
        let f = field.into();
        Self::with_message(ErrorCode::RequiredField, format!("{} required", f))
            .with_detail("field", f)
    }

    /// No menu document is stored for `lang`
    pub fn menu_not_found(lang: impl Into<String>) -> Self {
        let l = lang.into();
        Self::with_message(ErrorCode::MenuNotFound, format!("Menu '{}' not found", l))
            .with_detail("lang", l)
    }

    pub fn ticket_not_found(id: u64) -> Self {
        Self::with_message(ErrorCode::TicketNotFound, format!("Ticket {} not found", id))
            .with_detail("id", id)
    }

    pub fn revision_conflict(expected: u64, actual: u64) -> Self {
        Self::new(ErrorCode::RevisionConflict)
            .with_detail("expected", expected)
            .with_detail("actual", actual)
    }

    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }
}

/// Unified API response structure
///
/// - `code`: Error code (0 for success)
/// - `message`: Human-readable message
/// - `data`: Response payload (on success)
/// - `details`: Additional error details (on failure)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            code: Some(0),
            message: "OK".to_string(),
            data: Some(data),
            details: None,
        }
    }

    /// Create a success response with custom message and data
    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            code: Some(0),
            message: message.into(),
            data: Some(data),
            details: None,
        }
    }
}

impl ApiResponse<()> {
    /// Create a success response without data
    pub fn ok() -> Self {
        Self {
            code: Some(0),
            message: "OK".to_string(),
            data: None,
            details: None,
        }
    }

    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message.clone(),
            data: None,
            details: err.details.clone(),
        }
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message,
            data: None,
            details: err.details,
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ApiResponse::<()>::error(&self);

        if self.code.category() == ErrorCategory::System {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = match self.code {
            None | Some(0) => StatusCode::OK,
            Some(code) => ErrorCode::try_from(code)
                .map(|c| c.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        };

        (status, Json(self)).into_response()
    }
}
