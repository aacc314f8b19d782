//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 4xxx: Ticket errors
/// - 6xxx: Menu errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Ticket errors (4xxx)
    Ticket,
    /// Menu errors (6xxx)
    Menu,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            4000..5000 => Self::Ticket,
            6000..7000 => Self::Menu,
            9000.. => Self::System,
            _ => Self::General,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Ticket => "ticket",
            Self::Menu => "menu",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1003), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Ticket);
        assert_eq!(ErrorCategory::from_code(6003), ErrorCategory::Menu);
        assert_eq!(ErrorCategory::from_code(9101), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(12000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::RequiredField.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::TokenExpired.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::TicketNotFound.category(), ErrorCategory::Ticket);
        assert_eq!(ErrorCode::MenuNotFound.category(), ErrorCategory::Menu);
        assert_eq!(ErrorCode::PriceSyncFailed.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Menu).unwrap();
        assert_eq!(json, "\"menu\"");
        let category: ErrorCategory = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(category, ErrorCategory::System);
    }
}
