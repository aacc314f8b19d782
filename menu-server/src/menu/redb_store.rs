//! redb-backed menu store
//!
//! # Tables
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `menus` | language code | JSON-serialized `MenuTree` |
//!
//! Keys iterate in byte order, so [`MenuStore::languages`] (and therefore
//! the price fan-out) visits languages in ascending code order.

use std::borrow::Cow;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use shared::models::MenuTree;

use super::store::{MenuStore, StoreError, StoreResult};

/// key = language code, value = JSON-serialized MenuTree
const MENUS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("menus");

/// Menu store backed by redb
#[derive(Clone)]
pub struct RedbMenuStore {
    db: Arc<Database>,
}

impl RedbMenuStore {
    /// Wrap an open database, creating the menus table if missing
    pub fn new(db: Arc<Database>) -> StoreResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(MENUS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Store on a fresh in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::new(crate::db::open_in_memory()?)
    }

    /// Number of stored languages
    pub fn len(&self) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MENUS_TABLE)?;
        Ok(table.len()?)
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    fn decode(lang: &str, bytes: &[u8]) -> StoreResult<MenuTree> {
        serde_json::from_slice(bytes).map_err(|source| {
            tracing::error!(lang = %lang, error = %source, "Stored menu document is corrupt");
            StoreError::Corrupt {
                lang: lang.to_string(),
                source,
            }
        })
    }

    fn encode(lang: &str, tree: &MenuTree) -> StoreResult<Vec<u8>> {
        let tree = if tree.language_code == lang {
            Cow::Borrowed(tree)
        } else {
            let mut owned = tree.clone();
            owned.language_code = lang.to_string();
            Cow::Owned(owned)
        };
        Ok(serde_json::to_vec(tree.as_ref())?)
    }
}

impl MenuStore for RedbMenuStore {
    fn get(&self, lang: &str) -> StoreResult<Option<MenuTree>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MENUS_TABLE)?;

        match table.get(lang)? {
            Some(value) => Ok(Some(Self::decode(lang, value.value())?)),
            None => Ok(None),
        }
    }

    fn put(&self, lang: &str, tree: &MenuTree) -> StoreResult<()> {
        let value = Self::encode(lang, tree)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(MENUS_TABLE)?;
            table.insert(lang, value.as_slice())?;
        }
        write_txn.commit()?;

        tracing::debug!(lang = %lang, revision = tree.revision, "Menu stored");
        Ok(())
    }

    fn put_if_revision(&self, lang: &str, tree: &MenuTree, expected: u64) -> StoreResult<()> {
        let value = Self::encode(lang, tree)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(MENUS_TABLE)?;
            let actual = match table.get(lang)? {
                Some(stored) => Self::decode(lang, stored.value())?.revision,
                None => 0,
            };
            if actual != expected {
                // Dropping the transaction aborts it
                return Err(StoreError::RevisionMismatch {
                    lang: lang.to_string(),
                    expected,
                    actual,
                });
            }
            table.insert(lang, value.as_slice())?;
        }
        write_txn.commit()?;

        tracing::debug!(lang = %lang, revision = tree.revision, "Menu stored (revision checked)");
        Ok(())
    }

    fn languages(&self) -> StoreResult<Vec<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MENUS_TABLE)?;

        let mut langs = Vec::new();
        for result in table.iter()? {
            let (key, _value) = result?;
            langs.push(key.value().to_string());
        }
        Ok(langs)
    }

    fn clear(&self) -> StoreResult<usize> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(MENUS_TABLE)?;
            let keys: Vec<String> = table
                .iter()?
                .map(|entry| entry.map(|(key, _)| key.value().to_string()))
                .collect::<Result<_, _>>()?;
            for key in &keys {
                table.remove(key.as_str())?;
            }
            keys.len()
        };
        write_txn.commit()?;

        tracing::info!(removed, "Menu store cleared");
        Ok(removed)
    }
}
