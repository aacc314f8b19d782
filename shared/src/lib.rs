//! Shared types for the menu service
//!
//! Menu document model, tree walker, render hints, API DTOs and the
//! unified error system, used by menu-server and its tools.

pub mod client;
pub mod error;
pub mod menu;
pub mod models;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use menu::{ItemPath, OptionPath};
pub use models::{MenuItem, MenuTree, PricePair};
