//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::TicketNotFound
            | Self::MenuNotFound
            | Self::MenuItemNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::RevisionConflict | Self::MenuItemMismatch => {
                StatusCode::CONFLICT
            }

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::PriceSyncFailed
            | Self::StorageCorrupted => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::MenuNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::TicketNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(ErrorCode::RevisionConflict.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::MenuItemMismatch.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_unauthorized_status() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::InvalidCredentials.http_status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_internal_error_status() {
        assert_eq!(
            ErrorCode::PriceSyncFailed.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_bad_request_status() {
        assert_eq!(ErrorCode::RequiredField.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidFormat.http_status(), StatusCode::BAD_REQUEST);
    }
}
