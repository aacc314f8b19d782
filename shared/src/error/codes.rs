//! Unified error codes for the menu service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Ticket errors
//! - 6xxx: Menu errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the editor page can
/// branch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 4xxx: Ticket ====================
    /// Order ticket not found
    TicketNotFound = 4001,

    // ==================== 6xxx: Menu ====================
    /// No menu stored for the language
    MenuNotFound = 6001,
    /// Positional path addresses no item
    MenuItemNotFound = 6002,
    /// Menu changed since it was read
    RevisionConflict = 6003,
    /// Edited item was moved or replaced
    MenuItemMismatch = 6004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
    /// Price synchronization failed part-way
    PriceSyncFailed = 9101,
    /// Stored data could not be decoded
    StorageCorrupted = 9403,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field missing",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Invalid token",

            // Ticket
            ErrorCode::TicketNotFound => "Ticket not found",

            // Menu
            ErrorCode::MenuNotFound => "Menu not found",
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::RevisionConflict => "Menu was modified by another editor",
            ErrorCode::MenuItemMismatch => "Menu item no longer at this position",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::PriceSyncFailed => "Failed to update prices",
            ErrorCode::StorageCorrupted => "Storage corrupted (data file damaged)",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Ticket
            4001 => Ok(ErrorCode::TicketNotFound),

            // Menu
            6001 => Ok(ErrorCode::MenuNotFound),
            6002 => Ok(ErrorCode::MenuItemNotFound),
            6003 => Ok(ErrorCode::RevisionConflict),
            6004 => Ok(ErrorCode::MenuItemMismatch),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),
            9101 => Ok(ErrorCode::PriceSyncFailed),
            9403 => Ok(ErrorCode::StorageCorrupted),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::RequiredField.code(), 7);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::TicketNotFound.code(), 4001);
        assert_eq!(ErrorCode::MenuNotFound.code(), 6001);
        assert_eq!(ErrorCode::PriceSyncFailed.code(), 9101);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::MenuNotFound.is_success());
        assert!(!ErrorCode::InternalError.is_success());
    }

    #[test]
    fn test_try_from_covers_every_variant() {
        let all = [
            ErrorCode::Success,
            ErrorCode::Unknown,
            ErrorCode::ValidationFailed,
            ErrorCode::NotFound,
            ErrorCode::AlreadyExists,
            ErrorCode::InvalidRequest,
            ErrorCode::InvalidFormat,
            ErrorCode::RequiredField,
            ErrorCode::NotAuthenticated,
            ErrorCode::InvalidCredentials,
            ErrorCode::TokenExpired,
            ErrorCode::TokenInvalid,
            ErrorCode::TicketNotFound,
            ErrorCode::MenuNotFound,
            ErrorCode::MenuItemNotFound,
            ErrorCode::RevisionConflict,
            ErrorCode::MenuItemMismatch,
            ErrorCode::InternalError,
            ErrorCode::DatabaseError,
            ErrorCode::ConfigError,
            ErrorCode::PriceSyncFailed,
            ErrorCode::StorageCorrupted,
        ];
        for code in all {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(6101), Err(InvalidErrorCode(6101)));
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::MenuNotFound).unwrap(), "6001");
        let code: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(code, ErrorCode::TicketNotFound);
        assert!(serde_json::from_str::<ErrorCode>("10000").is_err());
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::MenuNotFound.message(), "Menu not found");
        assert_eq!(ErrorCode::PriceSyncFailed.message(), "Failed to update prices");
        assert_eq!(
            ErrorCode::InvalidCredentials.message(),
            "Invalid username or password"
        );
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
