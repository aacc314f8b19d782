//! redb-based ticket storage
//!
//! # Tables
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `tickets` | ticket id | JSON-serialized `Ticket` |
//!
//! Ids are `max(existing) + 1`, computed inside the creating write
//! transaction, so two concurrent creates never get the same id.

use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde_json::{Map, Value};
use shared::models::Ticket;
use thiserror::Error;

/// key = ticket id, value = JSON-serialized Ticket
const TICKETS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("tickets");

/// Ticket errors
#[derive(Debug, Error)]
pub enum TicketError {
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

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Ticket not found: {0}")]
    NotFound(u64),

    #[error("status required")]
    StatusRequired,
}

pub type TicketResult<T> = Result<T, TicketError>;

/// Ticket storage backed by redb
#[derive(Clone)]
pub struct TicketStorage {
    db: Arc<Database>,
}

impl TicketStorage {
    /// Wrap an open database, creating the tickets table if missing
    pub fn new(db: Arc<Database>) -> TicketResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TICKETS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    pub fn open_in_memory() -> TicketResult<Self> {
        Self::new(crate::db::open_in_memory()?)
    }

    /// All tickets, ascending id
    pub fn list(&self) -> TicketResult<Vec<Ticket>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TICKETS_TABLE)?;

        let mut tickets = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            tickets.push(serde_json::from_slice(value.value())?);
        }
        Ok(tickets)
    }

    pub fn get(&self, id: u64) -> TicketResult<Option<Ticket>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TICKETS_TABLE)?;

        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Store a new ticket built from the client payload
    pub fn create(&self, payload: Map<String, Value>, now_millis: i64) -> TicketResult<Ticket> {
        let write_txn = self.db.begin_write()?;
        let ticket = {
            let mut table = write_txn.open_table(TICKETS_TABLE)?;
            let next_id = match table.last()? {
                Some((key, _)) => key.value() + 1,
                None => 1,
            };
            let ticket = Ticket::new(next_id, now_millis, payload);
            let value = serde_json::to_vec(&ticket)?;
            table.insert(next_id, value.as_slice())?;
            ticket
        };
        write_txn.commit()?;

        tracing::info!(ticket_id = ticket.id, "Ticket created");
        Ok(ticket)
    }

    /// Set the status of a ticket. A missing status is rejected before the
    /// id is looked up.
    pub fn update_status(&self, id: u64, status: Option<&str>) -> TicketResult<Ticket> {
        let status = status
            .filter(|s| !s.trim().is_empty())
            .ok_or(TicketError::StatusRequired)?;

        let write_txn = self.db.begin_write()?;
        let ticket = {
            let mut table = write_txn.open_table(TICKETS_TABLE)?;
            let mut ticket: Ticket = match table.get(id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(TicketError::NotFound(id)),
            };
            ticket.status = status.to_string();
            let value = serde_json::to_vec(&ticket)?;
            table.insert(id, value.as_slice())?;
            ticket
        };
        write_txn.commit()?;

        tracing::info!(ticket_id = id, status = %status, "Ticket status updated");
        Ok(ticket)
    }

    pub fn delete(&self, id: u64) -> TicketResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TICKETS_TABLE)?;
            if table.remove(id)?.is_none() {
                return Err(TicketError::NotFound(id));
            }
        }
        write_txn.commit()?;

        tracing::info!(ticket_id = id, "Ticket deleted");
        Ok(())
    }
}
