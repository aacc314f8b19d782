//! Menu service
//!
//! Entry point used by the HTTP handlers and tools. Owns the store handle
//! and the per-language writer locks, so every read-modify-write on one
//! language goes through a single lock inside this process.

use std::sync::Arc;

use shared::client::{ContentEditRequest, EditorView, MenuWriteAck, PriceRow};
use shared::models::MenuTree;

use super::editor;
use super::error::{MenuError, MenuResult};
use super::price_sync::{self, PriceUpdate, SyncReport};
use super::store::{MenuStore, WriterLocks};
use crate::utils::time::now_millis;

#[derive(Clone)]
pub struct MenuService {
    store: Arc<dyn MenuStore>,
    locks: Arc<WriterLocks>,
}

impl std::fmt::Debug for MenuService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuService").finish_non_exhaustive()
    }
}

impl MenuService {
    pub fn new(store: Arc<dyn MenuStore>) -> Self {
        Self {
            store,
            locks: Arc::new(WriterLocks::new()),
        }
    }

    pub fn store(&self) -> &dyn MenuStore {
        self.store.as_ref()
    }

    /// Stored language codes, ascending
    pub fn languages(&self) -> MenuResult<Vec<String>> {
        Ok(self.store.languages()?)
    }

    /// Read one language. A missing language is `NotFound`, never an empty tree.
    pub fn read_menu(&self, lang: &str) -> MenuResult<MenuTree> {
        self.store
            .get(lang)?
            .ok_or_else(|| MenuError::NotFound(lang.to_string()))
    }

    /// Replace one language's document
    ///
    /// Without `expected_revision` the save is last-writer-wins (the legacy
    /// editor behavior). With it, the save is rejected unless the stored
    /// revision still matches; a language that does not exist yet has
    /// revision 0.
    pub fn write_menu(
        &self,
        lang: &str,
        mut tree: MenuTree,
        expected_revision: Option<u64>,
    ) -> MenuResult<MenuWriteAck> {
        let handle = self.locks.handle(lang);
        let _guard = WriterLocks::guard(&handle);

        let current = self.store.get(lang)?;
        let actual = current.as_ref().map(|t| t.revision).unwrap_or(0);
        if let Some(expected) = expected_revision
            && expected != actual
        {
            return Err(MenuError::RevisionConflict {
                lang: lang.to_string(),
                expected,
                actual,
            });
        }

        // Keep ids stable across saves from editors that drop them
        if let Some(current) = &current {
            tree.retain_item_ids(current);
        }
        let fresh = tree.ensure_item_ids();

        tree.language_code = lang.to_string();
        tree.revision = actual;
        tree.touch(now_millis());

        match expected_revision {
            Some(expected) => self.store.put_if_revision(lang, &tree, expected)?,
            None => self.store.put(lang, &tree)?,
        }

        tracing::info!(
            lang = %lang,
            revision = tree.revision,
            items = tree.item_count(),
            fresh_ids = fresh,
            "Menu saved"
        );
        Ok(MenuWriteAck {
            lang: lang.to_string(),
            revision: tree.revision,
        })
    }

    /// Propagate a price update to every stored language
    ///
    /// An update with a blank final price is rejected before any language
    /// is read.
    pub fn update_prices(&self, update: &PriceUpdate) -> MenuResult<SyncReport> {
        if let Some(key) = update.missing_final() {
            return Err(MenuError::ValidationMissing(format!("final price of {key}")));
        }
        let report = price_sync::synchronize(self.store.as_ref(), &self.locks, update, now_millis())?;
        tracing::info!(
            languages = ?report.language_codes(),
            items_updated = report.items_updated(),
            "Prices updated"
        );
        Ok(report)
    }

    pub fn editor_view(&self, lang: &str) -> MenuResult<EditorView> {
        Ok(editor::project(&self.read_menu(lang)?))
    }

    /// Write back content editor changes of one language
    pub fn apply_content_edits(
        &self,
        lang: &str,
        request: &ContentEditRequest,
    ) -> MenuResult<MenuWriteAck> {
        let handle = self.locks.handle(lang);
        let _guard = WriterLocks::guard(&handle);

        let mut tree = self.read_menu(lang)?;
        if let Some(base) = request.base_revision
            && base != tree.revision
        {
            return Err(MenuError::RevisionConflict {
                lang: lang.to_string(),
                expected: base,
                actual: tree.revision,
            });
        }

        let changed = editor::apply_edits(&mut tree, &request.edits)?;
        let read_revision = tree.revision;
        tree.touch(now_millis());
        self.store.put_if_revision(lang, &tree, read_revision)?;

        tracing::info!(lang = %lang, changed, revision = tree.revision, "Menu content edited");
        Ok(MenuWriteAck {
            lang: lang.to_string(),
            revision: tree.revision,
        })
    }

    /// Every walked item of one language with its current price
    pub fn price_table(&self, lang: &str) -> MenuResult<Vec<PriceRow>> {
        let tree = self.read_menu(lang)?;
        Ok(tree
            .items()
            .map(|(item, path)| PriceRow {
                id: item.id.clone(),
                name: item.name.clone(),
                path: path.to_string(),
                category: tree.categories[path.category].name.clone(),
                price: item.price.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::menu::redb_store::RedbMenuStore;
    use shared::client::ContentEdit;
    use shared::models::{Category, MenuItem, PricePair, Subcategory};

    fn service() -> MenuService {
        MenuService::new(Arc::new(RedbMenuStore::open_in_memory().unwrap()))
    }

    fn sopa_menu() -> MenuTree {
        let mut tree = MenuTree::new("es");
        tree.categories.push(Category {
            name: "Entradas".into(),
            items: vec![MenuItem {
                name: "Sopa".into(),
                description: Some("Del día".into()),
                price: Some(PricePair::new(Some("5000"), "4500")),
                ..Default::default()
            }],
            subcategories: vec![Subcategory {
                name: "Frías".into(),
                items: vec![MenuItem {
                    name: "Gazpacho".into(),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        });
        tree
    }

    #[test]
    fn test_read_missing_language_is_not_found() {
        let svc = service();
        let err = svc.read_menu("fr").unwrap_err();
        assert!(matches!(err, MenuError::NotFound(ref lang) if lang == "fr"));
    }

    #[test]
    fn test_empty_tree_is_not_not_found() {
        let svc = service();
        svc.write_menu("fr", MenuTree::new("fr"), None).unwrap();
        let tree = svc.read_menu("fr").unwrap();
        assert!(tree.categories.is_empty());
    }

    #[test]
    fn test_write_assigns_ids_and_revision() {
        let svc = service();
        let ack = svc.write_menu("es", sopa_menu(), None).unwrap();
        assert_eq!(ack.revision, 1);

        let stored = svc.read_menu("es").unwrap();
        assert!(stored.items().all(|(item, _)| !item.id.is_empty()));
        assert!(stored.updated_at.is_some());

        // Saving again without ids keeps the stored ones
        let first_id = stored.categories[0].items[0].id.clone();
        let ack = svc.write_menu("es", sopa_menu(), None).unwrap();
        assert_eq!(ack.revision, 2);
        assert_eq!(svc.read_menu("es").unwrap().categories[0].items[0].id, first_id);
    }

    #[test]
    fn test_write_keeps_ids_on_their_dish_after_insert() {
        let svc = service();
        svc.write_menu("es", sopa_menu(), None).unwrap();
        let sopa_id = svc.read_menu("es").unwrap().categories[0].items[0].id.clone();

        let mut tree = sopa_menu();
        tree.categories[0].items.insert(
            0,
            MenuItem {
                name: "Nuevo".into(),
                price: Some(PricePair::new(None, "3000")),
                ..Default::default()
            },
        );
        svc.write_menu("es", tree, None).unwrap();

        let stored = svc.read_menu("es").unwrap();
        let items = &stored.categories[0].items;
        assert_eq!(items[1].name, "Sopa");
        assert_eq!(items[1].id, sopa_id);
        assert_ne!(items[0].id, sopa_id);

        // Repricing by id touches Sopa only
        let prices = HashMap::from([(sopa_id, PricePair::new(None, "6000"))]);
        svc.update_prices(&PriceUpdate::by_id(prices)).unwrap();
        let stored = svc.read_menu("es").unwrap();
        assert_eq!(stored.categories[0].items[0].price, Some(PricePair::new(None, "3000")));
        assert_eq!(stored.categories[0].items[1].price, Some(PricePair::new(None, "6000")));
    }

    #[test]
    fn test_write_with_stale_revision_is_rejected() {
        let svc = service();
        svc.write_menu("es", sopa_menu(), Some(0)).unwrap();

        let err = svc.write_menu("es", MenuTree::new("es"), Some(0)).unwrap_err();
        assert!(matches!(err, MenuError::RevisionConflict { expected: 0, actual: 1, .. }));
        assert_eq!(svc.read_menu("es").unwrap().item_count(), 2);
    }

    #[test]
    fn test_update_prices_sopa_scenario() {
        let svc = service();
        svc.write_menu("es", sopa_menu(), None).unwrap();

        let prices = HashMap::from([("Sopa".to_string(), PricePair::new(Some("5500"), "5000"))]);
        let report = svc.update_prices(&PriceUpdate::by_name(prices)).unwrap();
        assert_eq!(report.items_updated(), 1);

        let stored = svc.read_menu("es").unwrap();
        let sopa = &stored.categories[0].items[0];
        assert_eq!(sopa.price, Some(PricePair::new(Some("5500"), "5000")));
        assert_eq!(sopa.description.as_deref(), Some("Del día"));
    }

    #[test]
    fn test_update_prices_requires_final_price() {
        let svc = service();
        svc.write_menu("es", sopa_menu(), None).unwrap();

        let prices = HashMap::from([("Sopa".to_string(), PricePair::new(Some("5500"), ""))]);
        let err = svc.update_prices(&PriceUpdate::by_name(prices)).unwrap_err();
        assert!(matches!(err, MenuError::ValidationMissing(_)));

        let stored = svc.read_menu("es").unwrap();
        assert_eq!(stored.revision, 1);
        assert_eq!(
            stored.categories[0].items[0].price,
            Some(PricePair::new(Some("5000"), "4500"))
        );
    }

    #[test]
    fn test_content_edit_round_trip() {
        let svc = service();
        svc.write_menu("es", sopa_menu(), None).unwrap();

        let view = svc.editor_view("es").unwrap();
        assert_eq!(view.entries.len(), 1);
        let entry = &view.entries[0];

        let request = ContentEditRequest {
            base_revision: Some(view.revision),
            edits: vec![ContentEdit {
                category_index: entry.category_index,
                item_index: entry.item_index,
                id: Some(entry.id.clone()),
                name: "Sopa castellana".into(),
                description: None,
            }],
        };
        let ack = svc.apply_content_edits("es", &request).unwrap();
        assert_eq!(ack.revision, view.revision + 1);
        assert_eq!(svc.read_menu("es").unwrap().categories[0].items[0].name, "Sopa castellana");

        // Replaying the same request is stale now
        let err = svc.apply_content_edits("es", &request).unwrap_err();
        assert!(matches!(err, MenuError::RevisionConflict { .. }));
    }

    #[test]
    fn test_price_table_walks_every_depth() {
        let svc = service();
        svc.write_menu("es", sopa_menu(), None).unwrap();

        let rows = svc.price_table("es").unwrap();
        let paths: Vec<&str> = rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["c0/i0", "c0/s0/i0"]);
        assert!(rows.iter().all(|r| r.category == "Entradas"));
        assert_eq!(rows[1].price, None);
    }
}
