//! Database Module
//!
//! 单个 redb 文件同时承载菜单表和点单表，进程内共享同一个 [`Database`]。

use std::path::Path;
use std::sync::Arc;

use redb::Database;

/// Open or create the database file, creating its parent directory
pub fn open(path: impl AsRef<Path>) -> Result<Arc<Database>, redb::DatabaseError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        tracing::warn!(dir = %parent.display(), error = %e, "Failed to create database directory");
    }

    tracing::info!(path = %path.display(), "Opening database");
    Ok(Arc::new(Database::create(path)?))
}

/// Open an in-memory database (tests and dry runs)
pub fn open_in_memory() -> Result<Arc<Database>, redb::DatabaseError> {
    let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
    Ok(Arc::new(db))
}
