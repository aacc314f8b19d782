//! Menu Model
//!
//! One [`MenuTree`] per language code. The persisted field names are the
//! Spanish keys the menu pages and the data files have always used
//! (`lang`, `categorias`, `nombre`, `precios`, ...); the Rust names are
//! their English meaning.
//!
//! Hierarchy, every level below category optional:
//!
//! ```text
//! MenuTree
//! └── Category
//!     ├── MenuItem ── ItemOption
//!     └── Subcategory
//!         ├── MenuItem
//!         └── MenuType
//!             └── MenuItem
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::menu::ItemPath;

/// Item identifier, shared by the language variants of the same dish
pub type ItemId = String;

/// Generate a fresh item id
pub fn new_item_id() -> ItemId {
    uuid::Uuid::new_v4().to_string()
}

/// Full menu of one language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuTree {
    /// Language code ("es", "en", ...). Immutable once stored.
    #[serde(rename = "lang", default)]
    pub language_code: String,
    #[serde(rename = "informacionGeneral", default)]
    pub general_info: GeneralInfo,
    #[serde(rename = "categorias", default)]
    pub categories: Vec<Category>,
    /// Incremented on every write through the menu service
    #[serde(default)]
    pub revision: u64,
    /// Unix millis of the last write through the menu service
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

/// Header and footer notes. Not traversed by price sync.
///
/// Keys other than the two note lists are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralInfo {
    #[serde(rename = "notasSuperiores", default)]
    pub header_notes: Vec<String>,
    #[serde(rename = "notasInferiores", default)]
    pub footer_notes: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "nota", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<MenuItem>,
    #[serde(rename = "subcategorias", default, skip_serializing_if = "Vec::is_empty")]
    pub subcategories: Vec<Subcategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "nota", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<MenuItem>,
    #[serde(rename = "tipos", default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<MenuType>,
}

/// Innermost grouping level ("tipo"), e.g. red / white / rosé under "Wines"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuType {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// A dish or drink
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Empty until [`MenuTree::ensure_item_ids`] runs
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: ItemId,
    /// Display name. Legacy price updates match on it; not unique.
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "precios", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<PricePair>,
    #[serde(rename = "opciones", default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ItemOption>,
}

/// Named sub-choice of an item (size, garnish, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemOption {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precios", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<PricePair>,
}

/// Base and final price, kept as display strings ("5.500", "12,50 €")
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePair {
    pub base: Option<String>,
    #[serde(rename = "final")]
    pub final_price: String,
}

impl PricePair {
    pub fn new(base: Option<&str>, final_price: &str) -> Self {
        Self {
            base: base.map(str::to_string),
            final_price: final_price.to_string(),
        }
    }
}

impl MenuTree {
    /// Empty tree for `lang`
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            language_code: lang.into(),
            general_info: GeneralInfo::default(),
            categories: Vec::new(),
            revision: 0,
            updated_at: None,
        }
    }

    /// Give every item without an id a fresh one. Returns how many were assigned.
    pub fn ensure_item_ids(&mut self) -> usize {
        let mut assigned = 0;
        for (item, _) in self.items_mut() {
            if item.id.is_empty() {
                item.id = new_item_id();
                assigned += 1;
            }
        }
        assigned
    }

    /// Copy ids from `base` onto items that have none and sit at the same
    /// path there. Used to link the language variants of one dish when
    /// documents are loaded without ids; names differ across languages, so
    /// position is all there is to go on.
    pub fn adopt_item_ids(&mut self, base: &MenuTree) -> usize {
        let mut adopted = 0;
        for (item, path) in self.items_mut() {
            if !item.id.is_empty() {
                continue;
            }
            if let Some(source) = base.item_at(path).filter(|s| !s.id.is_empty()) {
                item.id = source.id.clone();
                adopted += 1;
            }
        }
        adopted
    }

    /// Carry ids over from the stored version of the same language onto
    /// items that arrive without one.
    ///
    /// Items are matched by name, same container first, then anywhere in the
    /// document. Each stored id goes to at most one item and never to a dish
    /// with a different name, so inserted or reordered dishes keep their ids.
    pub fn retain_item_ids(&mut self, previous: &MenuTree) -> usize {
        let present: HashSet<ItemId> = self
            .items()
            .filter(|(item, _)| !item.id.is_empty())
            .map(|(item, _)| item.id.clone())
            .collect();
        let mut available: Vec<(&str, ItemPath, &str)> = previous
            .items()
            .filter(|(item, _)| !item.id.is_empty() && !present.contains(&item.id))
            .map(|(item, path)| (item.name.as_str(), path, item.id.as_str()))
            .collect();

        let mut retained = 0;
        for (item, path) in self.items_mut() {
            if !item.id.is_empty() {
                continue;
            }
            let found = available
                .iter()
                .position(|(name, from, _)| *name == item.name && from.same_container(&path))
                .or_else(|| available.iter().position(|(name, _, _)| *name == item.name));
            if let Some(idx) = found {
                item.id = available.remove(idx).2.to_string();
                retained += 1;
            }
        }
        retained
    }

    /// Record a write: bump the revision and stamp the time
    pub fn touch(&mut self, now_millis: i64) {
        self.revision += 1;
        self.updated_at = Some(now_millis);
    }
}
