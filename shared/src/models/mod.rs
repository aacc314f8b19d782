//! Data models
//!
//! Shared between menu-server and the menu pages (via API).

pub mod menu;
pub mod ticket;

// Re-exports
pub use menu::*;
pub use ticket::*;
