//! Order tickets (comandas)
//!
//! Stored in the same redb database as the menus.

pub mod storage;

use shared::error::{AppError, ErrorCode};

pub use storage::{TicketError, TicketResult, TicketStorage};

impl From<TicketError> for AppError {
    fn from(err: TicketError) -> Self {
        match err {
            TicketError::NotFound(id) => AppError::ticket_not_found(id),
            TicketError::StatusRequired => AppError::required_field("status"),
            other => {
                tracing::error!(error = %other, "Ticket storage failure");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}
