//! Price synchronization engine
//!
//! Propagates a set of price changes to every matching item of every stored
//! language. Matching is exact and case-sensitive; every occurrence is
//! updated, at any depth. Each language is read, updated in memory and
//! written back as a whole document, one language after another, in store
//! order. The first failed write stops the run: languages written before it
//! stay written, languages after it are never attempted.

use std::collections::HashMap;

use shared::models::{MenuTree, PricePair};
use thiserror::Error;

use super::store::{MenuStore, StoreError, WriterLocks};

/// What the keys of a [`PriceUpdate`] refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceKey {
    /// Item display name (legacy editor payloads)
    #[default]
    Name,
    /// Item id, shared by the language variants of one dish
    Id,
}

/// Which leaves a [`PriceUpdate`] may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncScope {
    #[default]
    Items,
    /// Options with a matching name are updated too (name keys only)
    ItemsAndOptions,
}

/// A set of price changes
#[derive(Debug, Clone, Default)]
pub struct PriceUpdate {
    pub key: PriceKey,
    pub scope: SyncScope,
    pub prices: HashMap<String, PricePair>,
}

impl PriceUpdate {
    pub fn by_name(prices: HashMap<String, PricePair>) -> Self {
        Self {
            key: PriceKey::Name,
            scope: SyncScope::Items,
            prices,
        }
    }

    pub fn by_id(prices: HashMap<String, PricePair>) -> Self {
        Self {
            key: PriceKey::Id,
            scope: SyncScope::Items,
            prices,
        }
    }

    pub fn including_options(mut self) -> Self {
        self.scope = SyncScope::ItemsAndOptions;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// First key whose final price is blank
    pub fn missing_final(&self) -> Option<&str> {
        self.prices
            .iter()
            .find(|(_, price)| price.final_price.trim().is_empty())
            .map(|(key, _)| key.as_str())
    }

    /// Apply to one tree in memory. Returns the number of leaves rewritten.
    pub fn apply(&self, tree: &mut MenuTree) -> usize {
        let mut updated = 0;

        for (item, _) in tree.items_mut() {
            let key = match self.key {
                PriceKey::Name => &item.name,
                PriceKey::Id => &item.id,
            };
            if let Some(price) = self.prices.get(key) {
                item.price = Some(price.clone());
                updated += 1;
            }
        }

        if self.scope == SyncScope::ItemsAndOptions && self.key == PriceKey::Name {
            for (option, _) in tree.options_mut() {
                if let Some(price) = self.prices.get(&option.name) {
                    option.price = Some(price.clone());
                    updated += 1;
                }
            }
        }

        updated
    }
}

/// Per-language outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSync {
    pub lang: String,
    pub items_updated: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub languages: Vec<LanguageSync>,
}

impl SyncReport {
    pub fn items_updated(&self) -> usize {
        self.languages.iter().map(|l| l.items_updated).sum()
    }

    pub fn language_codes(&self) -> Vec<String> {
        self.languages.iter().map(|l| l.lang.clone()).collect()
    }
}

/// Failure of a run. Callers outside the engine only learn that it failed.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to list stored menus: {0}")]
    Enumerate(#[source] StoreError),

    #[error("Price sync aborted at '{failed}' (committed: {committed:?}, not attempted: {skipped:?})")]
    Aborted {
        committed: Vec<String>,
        failed: String,
        skipped: Vec<String>,
        #[source]
        source: StoreError,
    },
}

/// Read, update and write back one language. Returns leaves rewritten;
/// a language that disappeared since enumeration counts as zero.
fn sync_language(
    store: &dyn MenuStore,
    lang: &str,
    update: &PriceUpdate,
    now_millis: i64,
) -> Result<usize, StoreError> {
    let Some(mut tree) = store.get(lang)? else {
        tracing::warn!(lang = %lang, "Menu vanished during price sync, skipping");
        return Ok(0);
    };

    let updated = update.apply(&mut tree);
    tree.touch(now_millis);
    store.put(lang, &tree)?;
    Ok(updated)
}

/// Run `update` against every stored language
///
/// Each language's read-modify-write holds that language's writer lock.
pub fn synchronize(
    store: &dyn MenuStore,
    locks: &WriterLocks,
    update: &PriceUpdate,
    now_millis: i64,
) -> Result<SyncReport, SyncError> {
    let languages = store.languages().map_err(SyncError::Enumerate)?;
    tracing::info!(
        keys = update.prices.len(),
        key = ?update.key,
        scope = ?update.scope,
        languages = ?languages,
        "Price sync started"
    );

    let mut report = SyncReport::default();
    for (index, lang) in languages.iter().enumerate() {
        let handle = locks.handle(lang);
        let result = {
            let _guard = WriterLocks::guard(&handle);
            sync_language(store, lang, update, now_millis)
        };

        match result {
            Ok(items_updated) => {
                tracing::debug!(lang = %lang, items_updated, "Language prices written");
                report.languages.push(LanguageSync {
                    lang: lang.clone(),
                    items_updated,
                });
            }
            Err(source) => {
                let committed = report.language_codes();
                let skipped = languages[index + 1..].to_vec();
                tracing::error!(
                    failed = %lang,
                    corrupt = source.is_corrupt(),
                    committed = ?committed,
                    skipped = ?skipped,
                    error = %source,
                    "Price sync aborted"
                );
                return Err(SyncError::Aborted {
                    committed,
                    failed: lang.clone(),
                    skipped,
                    source,
                });
            }
        }
    }

    tracing::info!(
        languages = report.languages.len(),
        items_updated = report.items_updated(),
        "Price sync finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::redb_store::RedbMenuStore;
    use crate::menu::store::StoreResult;
    use shared::models::{Category, ItemOption, MenuItem, MenuType, Subcategory};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const NOW: i64 = 1_700_000_000_000;

    fn item(id: &str, name: &str, final_price: &str) -> MenuItem {
        MenuItem {
            id: id.into(),
            name: name.into(),
            description: Some(format!("{} de la casa", name)),
            price: Some(PricePair::new(None, final_price)),
            options: Vec::new(),
        }
    }

    fn menu(lang: &str) -> MenuTree {
        let mut tree = MenuTree::new(lang);
        tree.categories = vec![
            Category {
                name: "Entrantes".into(),
                items: vec![
                    item("sopa", "Sopa", "4500"),
                    MenuItem {
                        id: "pan".into(),
                        name: "Pan".into(),
                        price: None,
                        ..Default::default()
                    },
                ],
                ..Default::default()
            },
            Category {
                name: "Principales".into(),
                items: vec![item("pasta-1", "Pasta", "9000")],
                subcategories: vec![Subcategory {
                    name: "Del chef".into(),
                    types: vec![MenuType {
                        name: "Italiana".into(),
                        items: vec![MenuItem {
                            options: vec![ItemOption {
                                name: "Pasta".into(),
                                price: Some(PricePair::new(None, "100")),
                            }],
                            ..item("pasta-2", "Pasta", "9500")
                        }],
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            },
        ];
        tree
    }

    fn prices(entries: &[(&str, Option<&str>, &str)]) -> HashMap<String, PricePair> {
        entries
            .iter()
            .map(|(k, base, fin)| (k.to_string(), PricePair::new(*base, fin)))
            .collect()
    }

    fn store_with(langs: &[&str]) -> RedbMenuStore {
        let store = RedbMenuStore::open_in_memory().unwrap();
        for lang in langs {
            store.put(lang, &menu(lang)).unwrap();
        }
        store
    }

    #[test]
    fn test_sopa_price_update() {
        let store = store_with(&["es"]);
        let update = PriceUpdate::by_name(prices(&[("Sopa", Some("5500"), "5000")]));

        synchronize(&store, &WriterLocks::new(), &update, NOW).unwrap();

        let tree = store.get("es").unwrap().unwrap();
        let sopa = &tree.categories[0].items[0];
        assert_eq!(sopa.price, Some(PricePair::new(Some("5500"), "5000")));
        assert_eq!(sopa.name, "Sopa");
        assert_eq!(sopa.description.as_deref(), Some("Sopa de la casa"));
        assert_eq!(sopa.id, "sopa");
    }

    #[test]
    fn test_fan_out_across_depths_and_languages() {
        let store = store_with(&["en", "es"]);
        let update = PriceUpdate::by_name(prices(&[("Pasta", None, "9900")]));

        let report = synchronize(&store, &WriterLocks::new(), &update, NOW).unwrap();
        assert_eq!(report.items_updated(), 4);
        assert_eq!(report.language_codes(), vec!["en", "es"]);

        for lang in ["en", "es"] {
            let tree = store.get(lang).unwrap().unwrap();
            let pastas: Vec<_> = tree
                .items()
                .filter(|(i, _)| i.name == "Pasta")
                .map(|(i, _)| i.price.clone())
                .collect();
            assert_eq!(pastas.len(), 2);
            assert!(
                pastas
                    .iter()
                    .all(|p| *p == Some(PricePair::new(None, "9900")))
            );
        }
    }

    #[test]
    fn test_non_matching_items_untouched() {
        let store = store_with(&["es"]);
        let before = store.get("es").unwrap().unwrap();
        let update = PriceUpdate::by_name(prices(&[("Sopa", Some("1"), "1"), ("sopa", None, "2")]));

        synchronize(&store, &WriterLocks::new(), &update, NOW).unwrap();

        let after = store.get("es").unwrap().unwrap();
        for ((old, path), (new, _)) in before.items().zip(after.items()) {
            if old.name != "Sopa" {
                assert_eq!(old, new, "item at {} changed", path);
            }
        }
        // Pan had no price and must still have none
        assert_eq!(after.categories[0].items[1].price, None);
    }

    #[test]
    fn test_options_untouched_by_default() {
        let store = store_with(&["es"]);
        let update = PriceUpdate::by_name(prices(&[("Pasta", None, "9900")]));

        synchronize(&store, &WriterLocks::new(), &update, NOW).unwrap();

        let tree = store.get("es").unwrap().unwrap();
        let (option, _) = tree.options().next().unwrap();
        assert_eq!(option.price, Some(PricePair::new(None, "100")));
    }

    #[test]
    fn test_options_updated_when_opted_in() {
        let mut tree = menu("es");
        let update = PriceUpdate::by_name(prices(&[("Pasta", None, "9900")])).including_options();

        assert_eq!(update.apply(&mut tree), 3);
        let (option, _) = tree.options().next().unwrap();
        assert_eq!(option.price, Some(PricePair::new(None, "9900")));
    }

    #[test]
    fn test_id_keyed_update_targets_one_dish() {
        let mut tree = menu("es");
        let update = PriceUpdate::by_id(prices(&[("pasta-2", None, "1200")]));

        assert_eq!(update.apply(&mut tree), 1);
        assert_eq!(
            tree.categories[1].items[0].price,
            Some(PricePair::new(None, "9000"))
        );
        assert_eq!(
            tree.categories[1].subcategories[0].types[0].items[0].price,
            Some(PricePair::new(None, "1200"))
        );
    }

    #[test]
    fn test_update_is_idempotent() {
        let store = store_with(&["en", "es"]);
        let update = PriceUpdate::by_name(prices(&[("Pasta", Some("10000"), "9900")]));
        let locks = WriterLocks::new();

        synchronize(&store, &locks, &update, NOW).unwrap();
        let mut once = store.get("es").unwrap().unwrap();
        synchronize(&store, &locks, &update, NOW).unwrap();
        let mut twice = store.get("es").unwrap().unwrap();

        // Only the write bookkeeping differs
        assert_eq!(twice.revision, once.revision + 1);
        once.revision = 0;
        twice.revision = 0;
        assert_eq!(once, twice);
    }

    #[test]
    fn test_every_language_written_even_without_matches() {
        let store = store_with(&["en", "es"]);
        let update = PriceUpdate::by_name(prices(&[("Nothing", None, "1")]));

        let report = synchronize(&store, &WriterLocks::new(), &update, NOW).unwrap();
        assert_eq!(report.items_updated(), 0);
        assert_eq!(store.get("en").unwrap().unwrap().revision, 1);
        assert_eq!(store.get("en").unwrap().unwrap().updated_at, Some(NOW));
    }

    /// Store whose n-th put (1-based) fails; every put attempt is recorded
    struct FailingStore {
        inner: RedbMenuStore,
        fail_on: usize,
        puts: AtomicUsize,
        attempted: std::sync::Mutex<Vec<String>>,
    }

    impl FailingStore {
        fn new(inner: RedbMenuStore, fail_on: usize) -> Self {
            Self {
                inner,
                fail_on,
                puts: AtomicUsize::new(0),
                attempted: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    impl MenuStore for FailingStore {
        fn get(&self, lang: &str) -> StoreResult<Option<MenuTree>> {
            self.inner.get(lang)
        }

        fn put(&self, lang: &str, tree: &MenuTree) -> StoreResult<()> {
            self.attempted.lock().unwrap().push(lang.to_string());
            if self.puts.fetch_add(1, Ordering::SeqCst) + 1 == self.fail_on {
                return Err(StoreError::Unavailable("disk full".into()));
            }
            self.inner.put(lang, tree)
        }

        fn put_if_revision(&self, lang: &str, tree: &MenuTree, expected: u64) -> StoreResult<()> {
            self.inner.put_if_revision(lang, tree, expected)
        }

        fn languages(&self) -> StoreResult<Vec<String>> {
            self.inner.languages()
        }

        fn clear(&self) -> StoreResult<usize> {
            self.inner.clear()
        }
    }

    #[test]
    fn test_partial_failure_stops_fan_out() {
        let store = FailingStore::new(store_with(&["de", "en", "es"]), 2);
        let update = PriceUpdate::by_name(prices(&[("Sopa", Some("5500"), "5000")]));

        let err = synchronize(&store, &WriterLocks::new(), &update, NOW).unwrap_err();

        match err {
            SyncError::Aborted {
                committed,
                failed,
                skipped,
                ..
            } => {
                assert_eq!(committed, vec!["de"]);
                assert_eq!(failed, "en");
                assert_eq!(skipped, vec!["es"]);
            }
            other => panic!("unexpected error: {other}"),
        }

        // Third language never attempted
        assert_eq!(*store.attempted.lock().unwrap(), vec!["de", "en"]);

        let sopa_price = |lang: &str| {
            store.inner.get(lang).unwrap().unwrap().categories[0].items[0]
                .price
                .clone()
        };
        assert_eq!(sopa_price("de"), Some(PricePair::new(Some("5500"), "5000")));
        assert_eq!(sopa_price("en"), Some(PricePair::new(None, "4500")));
        assert_eq!(sopa_price("es"), Some(PricePair::new(None, "4500")));
    }
}
