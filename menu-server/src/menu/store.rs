//! Menu store abstraction
//!
//! One [`MenuTree`] per language code. Writes are whole-document
//! replacements; there is no transaction spanning two languages.

use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashMap;
use shared::models::MenuTree;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Failed to encode menu: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Stored menu '{lang}' is corrupt: {source}")]
    Corrupt {
        lang: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Menu '{lang}' is at revision {actual}, expected {expected}")]
    RevisionMismatch {
        lang: String,
        expected: u64,
        actual: u64,
    },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Stored bytes could not be decoded (as opposed to the database failing)
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence of menu documents keyed by language code
///
/// Implementations must store `tree` under `lang` with its language code
/// set to `lang`, whatever the tree carried.
pub trait MenuStore: Send + Sync {
    /// `Ok(None)` when nothing is stored for `lang`
    fn get(&self, lang: &str) -> StoreResult<Option<MenuTree>>;

    /// Replace the document of `lang`
    fn put(&self, lang: &str, tree: &MenuTree) -> StoreResult<()>;

    /// Replace the document of `lang` only if the stored revision equals
    /// `expected` (0 when nothing is stored). Check and write are atomic.
    fn put_if_revision(&self, lang: &str, tree: &MenuTree, expected: u64) -> StoreResult<()>;

    /// Stored language codes, in the order writes fan out
    fn languages(&self) -> StoreResult<Vec<String>>;

    /// Delete every document. Returns how many were removed.
    fn clear(&self) -> StoreResult<usize>;
}

/// Per-language writer locks
///
/// Holding a language's guard serializes read-modify-write cycles on that
/// language within this process. Guards are never held across `.await`.
#[derive(Debug, Default)]
pub struct WriterLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl WriterLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock handle for `lang`; call `.lock()` on it through [`WriterLocks::guard`]
    pub fn handle(&self, lang: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(lang.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Block until `handle`'s language is free
    pub fn guard(handle: &Mutex<()>) -> MutexGuard<'_, ()> {
        // The mutex guards no data, so a poisoned lock is still usable
        handle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
