//! Menu domain
//!
//! - [`store`]: storage trait and per-language writer locks
//! - [`redb_store`]: redb backend
//! - [`price_sync`]: price fan-out across languages
//! - [`editor`]: content editor projection and write-back
//! - [`loader`]: bulk load from `menu_<lang>.json` files
//! - [`service`]: the entry point used by handlers

pub mod editor;
pub mod error;
pub mod loader;
pub mod price_sync;
pub mod redb_store;
pub mod service;
pub mod store;

pub use error::{MenuError, MenuResult};
pub use price_sync::{PriceKey, PriceUpdate, SyncError, SyncReport, SyncScope};
pub use redb_store::RedbMenuStore;
pub use service::MenuService;
pub use store::{MenuStore, StoreError, StoreResult, WriterLocks};
