//! Menu domain errors
//!
//! | Variant | HTTP | ErrorCode |
//! |---------|------|-----------|
//! | NotFound | 404 | MenuNotFound |
//! | ItemNotFound | 404 | MenuItemNotFound |
//! | ValidationMissing | 400 | RequiredField |
//! | RevisionConflict | 409 | RevisionConflict |
//! | ItemMismatch | 409 | MenuItemMismatch |
//! | Store | 500 | DatabaseError / StorageCorrupted |
//! | PartialSync | 500 | PriceSyncFailed |
//!
//! Store and sync failures reach the caller with a generic message; the
//! cause is only logged.

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use super::price_sync::SyncError;
use super::store::StoreError;

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Menu '{0}' not found")]
    NotFound(String),

    #[error("No item at position {0}")]
    ItemNotFound(String),

    #[error("{0}")]
    ValidationMissing(String),

    #[error("Menu '{lang}' is at revision {actual}, expected {expected}")]
    RevisionConflict {
        lang: String,
        expected: u64,
        actual: u64,
    },

    #[error("Item at {position} is '{found}', expected '{expected}'")]
    ItemMismatch {
        position: String,
        expected: String,
        found: String,
    },

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    PartialSync(#[from] SyncError),
}

pub type MenuResult<T> = Result<T, MenuError>;

impl From<StoreError> for MenuError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::RevisionMismatch {
                lang,
                expected,
                actual,
            } => Self::RevisionConflict {
                lang,
                expected,
                actual,
            },
            other => Self::Store(other),
        }
    }
}

impl From<MenuError> for AppError {
    fn from(err: MenuError) -> Self {
        match err {
            MenuError::NotFound(lang) => AppError::menu_not_found(lang),
            MenuError::ItemNotFound(position) => {
                AppError::with_message(ErrorCode::MenuItemNotFound, format!("No item at {}", position))
                    .with_detail("position", position)
            }
            MenuError::ValidationMissing(msg) => AppError::with_message(ErrorCode::RequiredField, msg),
            MenuError::RevisionConflict {
                expected, actual, ..
            } => AppError::revision_conflict(expected, actual),
            MenuError::ItemMismatch {
                position,
                expected,
                found,
            } => AppError::new(ErrorCode::MenuItemMismatch)
                .with_detail("position", position)
                .with_detail("expected", expected)
                .with_detail("found", found),
            MenuError::Store(e) => {
                tracing::error!(error = %e, corrupt = e.is_corrupt(), "Menu store failure");
                if e.is_corrupt() {
                    AppError::new(ErrorCode::StorageCorrupted)
                } else {
                    AppError::new(ErrorCode::DatabaseError)
                }
            }
            MenuError::PartialSync(e) => {
                tracing::error!(error = %e, "Price update failed");
                AppError::new(ErrorCode::PriceSyncFailed)
            }
        }
    }
}
