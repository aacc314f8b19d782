//! Bulk menu loader
//!
//! Reads `menu_<lang>.json` files from a directory and replaces the whole
//! store with them. The language code comes from the file name. Every file
//! is parsed before the store is cleared, so a malformed file leaves the
//! store untouched.
//!
//! Item ids are linked across languages by position: the Spanish document
//! (or the first one, without Spanish) gets fresh ids, the others adopt the
//! id of the item at the same path there.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use shared::menu::locale::FALLBACK_LANGUAGE;
use shared::models::MenuTree;
use thiserror::Error;

use super::store::{MenuStore, StoreError};

const FILE_PREFIX: &str = "menu_";
const FILE_EXTENSION: &str = ".json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Data directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid menu file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No menu files found in {0}")]
    Empty(PathBuf),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Documents removed before loading
    pub cleared: usize,
    /// Languages loaded, in file name order
    pub languages: Vec<String>,
}

/// Language code of a menu file name: `menu_es.json` -> `es`
///
/// The code runs up to the first `.`, so `menu_pt.backup.json` loads as `pt`.
pub fn language_from_filename(file_name: &str) -> Option<&str> {
    if !file_name.ends_with(FILE_EXTENSION) {
        return None;
    }
    let rest = file_name.strip_prefix(FILE_PREFIX)?;
    let (lang, _) = rest.split_once('.')?;
    if lang.is_empty() {
        return None;
    }
    Some(lang)
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> LoadError + '_ {
    move |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Menu files of `dir` as `(lang, path)`, sorted by file name
///
/// When two files name the same language, the later one in name order wins.
pub fn scan(dir: &Path) -> Result<Vec<(String, PathBuf)>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::MissingDirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error(dir))? {
        let entry = entry.map_err(io_error(dir))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        match language_from_filename(name) {
            Some(lang) => files.push((lang.to_string(), path.clone())),
            None => tracing::debug!(file = %name, "Skipping non-menu file"),
        }
    }

    files.sort_by(|a, b| a.1.cmp(&b.1));

    let mut seen = HashSet::new();
    files.reverse();
    files.retain(|(lang, path)| {
        let first = seen.insert(lang.clone());
        if !first {
            tracing::warn!(lang = %lang, file = %path.display(), "Shadowed menu file skipped");
        }
        first
    });
    files.reverse();
    Ok(files)
}

fn parse(lang: &str, path: &Path) -> Result<MenuTree, LoadError> {
    let content = std::fs::read_to_string(path).map_err(io_error(path))?;
    let mut tree: MenuTree = serde_json::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tree.language_code = lang.to_string();
    Ok(tree)
}

/// Link item ids across the loaded languages
fn link_item_ids(trees: &mut [MenuTree]) {
    let Some(base_index) = trees
        .iter()
        .position(|t| t.language_code == FALLBACK_LANGUAGE)
        .or((!trees.is_empty()).then_some(0))
    else {
        return;
    };

    trees[base_index].ensure_item_ids();
    let base = trees[base_index].clone();
    for (index, tree) in trees.iter_mut().enumerate() {
        if index == base_index {
            continue;
        }
        let adopted = tree.adopt_item_ids(&base);
        let fresh = tree.ensure_item_ids();
        tracing::debug!(lang = %tree.language_code, adopted, fresh, "Item ids linked");
    }
}

/// Replace the store's content with the menu files of `dir`
pub fn bulk_load(store: &dyn MenuStore, dir: &Path, now_millis: i64) -> Result<LoadReport, LoadError> {
    let files = scan(dir)?;
    if files.is_empty() {
        return Err(LoadError::Empty(dir.to_path_buf()));
    }

    let mut trees = files
        .iter()
        .map(|(lang, path)| parse(lang, path))
        .collect::<Result<Vec<_>, _>>()?;
    link_item_ids(&mut trees);

    let cleared = store.clear()?;
    tracing::info!(cleared, dir = %dir.display(), "Store cleared for bulk load");

    let mut report = LoadReport {
        cleared,
        languages: Vec::with_capacity(trees.len()),
    };
    for mut tree in trees {
        tree.revision = 0;
        tree.touch(now_millis);
        let lang = tree.language_code.clone();
        store.put(&lang, &tree)?;
        tracing::info!(lang = %lang, items = tree.item_count(), "Menu loaded");
        report.languages.push(lang);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::redb_store::RedbMenuStore;

    const NOW: i64 = 1_700_000_000_000;

    fn menu_json(dish: &str) -> String {
        format!(
            r#"{{
                "informacionGeneral": {{ "notasSuperiores": [], "notasInferiores": [] }},
                "categorias": [
                    {{ "nombre": "Entrantes", "items": [
                        {{ "nombre": "{dish}", "precios": {{ "base": null, "final": "4500" }} }}
                    ] }}
                ]
            }}"#
        )
    }

    #[test]
    fn test_language_from_filename() {
        assert_eq!(language_from_filename("menu_es.json"), Some("es"));
        assert_eq!(language_from_filename("menu_pt.backup.json"), Some("pt"));
        assert_eq!(language_from_filename("menu_cn.JSON"), None);
        assert_eq!(language_from_filename("menu_.json"), None);
        assert_eq!(language_from_filename("orders.json"), None);
        assert_eq!(language_from_filename("menu_es.txt"), None);
    }

    #[test]
    fn test_scan_keeps_one_file_per_language() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("menu_pt.backup.json"), menu_json("Sopa velha")).unwrap();
        std::fs::write(dir.path().join("menu_pt.json"), menu_json("Sopa")).unwrap();
        std::fs::write(dir.path().join("menu_it.v2.json"), menu_json("Zuppa")).unwrap();

        let files = scan(dir.path()).unwrap();
        let langs: Vec<&str> = files.iter().map(|(lang, _)| lang.as_str()).collect();
        assert_eq!(langs, vec!["it", "pt"]);
        assert!(files[1].1.ends_with("menu_pt.json"));

        let store = RedbMenuStore::open_in_memory().unwrap();
        bulk_load(&store, dir.path(), NOW).unwrap();
        assert_eq!(store.get("it").unwrap().unwrap().categories[0].items[0].name, "Zuppa");
        assert_eq!(store.get("pt").unwrap().unwrap().categories[0].items[0].name, "Sopa");
    }

    #[test]
    fn test_bulk_load_replaces_store() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("menu_es.json"), menu_json("Sopa")).unwrap();
        std::fs::write(dir.path().join("menu_en.json"), menu_json("Soup")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let store = RedbMenuStore::open_in_memory().unwrap();
        store.put("fr", &MenuTree::new("fr")).unwrap();

        let report = bulk_load(&store, dir.path(), NOW).unwrap();
        assert_eq!(report.cleared, 1);
        assert_eq!(report.languages, vec!["en", "es"]);
        assert_eq!(store.languages().unwrap(), vec!["en", "es"]);

        let es = store.get("es").unwrap().unwrap();
        let en = store.get("en").unwrap().unwrap();
        assert_eq!(es.language_code, "es");
        assert_eq!(es.revision, 1);
        assert_eq!(en.categories[0].items[0].name, "Soup");

        // Same dish, same id across languages
        let es_id = &es.categories[0].items[0].id;
        assert!(!es_id.is_empty());
        assert_eq!(&en.categories[0].items[0].id, es_id);
    }

    #[test]
    fn test_malformed_file_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("menu_es.json"), menu_json("Sopa")).unwrap();
        std::fs::write(dir.path().join("menu_it.json"), "{ broken").unwrap();

        let store = RedbMenuStore::open_in_memory().unwrap();
        store.put("fr", &MenuTree::new("fr")).unwrap();

        let err = bulk_load(&store, dir.path(), NOW).unwrap_err();
        assert!(matches!(err, LoadError::Parse { ref path, .. } if path.ends_with("menu_it.json")));
        assert_eq!(store.languages().unwrap(), vec!["fr"]);
    }

    #[test]
    fn test_missing_directory() {
        let store = RedbMenuStore::open_in_memory().unwrap();
        let err = bulk_load(&store, Path::new("/definitely/not/here"), NOW).unwrap_err();
        assert!(matches!(err, LoadError::MissingDirectory(_)));
    }

    #[test]
    fn test_directory_without_menus() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.md"), "# menus").unwrap();

        let store = RedbMenuStore::open_in_memory().unwrap();
        let err = bulk_load(&store, dir.path(), NOW).unwrap_err();
        assert!(matches!(err, LoadError::Empty(_)));
    }
}
