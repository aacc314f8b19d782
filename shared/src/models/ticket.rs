//! Order Ticket Model (comanda)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status every new ticket starts in
pub const STATUS_IN_PROGRESS: &str = "in-progress";

/// Keys owned by the server; stripped from client payloads
const RESERVED_KEYS: &[&str] = &["id", "startTime", "status"];

/// Ticket entity. Everything the client sent besides the reserved keys is
/// kept verbatim in `payload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    pub status: String,
    /// Unix millis, assigned by the server
    #[serde(rename = "startTime")]
    pub start_time: i64,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Ticket {
    pub fn new(id: u64, start_time: i64, mut payload: Map<String, Value>) -> Self {
        for key in RESERVED_KEYS {
            payload.remove(*key);
        }
        Self {
            id,
            status: STATUS_IN_PROGRESS.to_string(),
            start_time,
            payload,
        }
    }
}

/// Update ticket status payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketStatusUpdate {
    pub status: Option<String>,
}
