//! Request/response types shared between menu-server and the menu pages
//!
//! These are the bodies of the JSON API. The menu document itself is
//! [`crate::models::MenuTree`] and travels as-is.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{ItemId, PricePair};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    /// Seconds until the token expires
    pub expires_in: i64,
}

// =============================================================================
// Price API DTOs
// =============================================================================

/// Price as sent by the editor. `final` is checked by the server, so a
/// missing one is a validation error rather than a body rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceInput {
    #[serde(default)]
    pub base: Option<String>,
    #[serde(rename = "final", default)]
    pub final_price: Option<String>,
}

/// Name-keyed price update body: `{ "Sopa": { "base": "5500", "final": "5000" } }`
pub type PricesByName = HashMap<String, PriceInput>;

/// Id-keyed price update body
pub type PricesById = HashMap<ItemId, PriceInput>;

/// Query flags of the price update endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdateQuery {
    /// Also update options whose name matches a key
    #[serde(default)]
    pub include_options: bool,
}

/// One row of the price table shown to the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRow {
    pub id: ItemId,
    pub name: String,
    /// Walker path, e.g. `c1/s0/t2/i3`
    pub path: String,
    pub category: String,
    pub price: Option<PricePair>,
}

/// Outcome of a price update, as reported to the editor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdateSummary {
    pub languages: Vec<String>,
    pub items_updated: usize,
}

// =============================================================================
// Menu API DTOs
// =============================================================================

/// Query of the full-document save
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSaveQuery {
    /// Reject the save unless the stored revision still equals this
    pub expected_revision: Option<u64>,
}

/// Result of a menu write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuWriteAck {
    pub lang: String,
    pub revision: u64,
}

// =============================================================================
// Content editor DTOs
// =============================================================================

/// One editable item, addressed by its position under a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorEntry {
    pub category_index: usize,
    pub item_index: usize,
    pub category: String,
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
}

/// Editable view of one language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    pub lang: String,
    pub revision: u64,
    pub entries: Vec<EditorEntry>,
}

/// Edited fields for one position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEdit {
    pub category_index: usize,
    pub item_index: usize,
    /// Id the entry was read with; checked when present
    #[serde(default)]
    pub id: Option<ItemId>,
    pub name: String,
    /// Empty string clears the description
    #[serde(default)]
    pub description: Option<String>,
}

/// Write-back request of the content editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEditRequest {
    /// Revision the view was read at; checked when present
    #[serde(default)]
    pub base_revision: Option<u64>,
    pub edits: Vec<ContentEdit>,
}
