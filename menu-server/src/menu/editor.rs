//! Content editor projection
//!
//! The editor lists only the items placed directly under a category,
//! addressed by `(category_index, item_index)`. Items reachable only through
//! a subcategory or a type are not editable here.
//!
//! Write-back is positional: each edit overwrites name and description of
//! whatever item sits at its position in the current document. An edit that
//! carries the id it was read with is rejected when another item now sits
//! there. Edits are validated as a batch; nothing is applied unless every
//! edit is valid.

use shared::client::{ContentEdit, EditorEntry, EditorView};
use shared::models::MenuTree;

use super::error::MenuError;

/// Build the editable view of `tree`
pub fn project(tree: &MenuTree) -> EditorView {
    let entries = tree
        .categories
        .iter()
        .enumerate()
        .flat_map(|(ci, category)| {
            category
                .items
                .iter()
                .enumerate()
                .map(move |(ii, item)| EditorEntry {
                    category_index: ci,
                    item_index: ii,
                    category: category.name.clone(),
                    id: item.id.clone(),
                    name: item.name.clone(),
                    description: item.description.clone(),
                })
        })
        .collect();

    EditorView {
        lang: tree.language_code.clone(),
        revision: tree.revision,
        entries,
    }
}

fn check(tree: &MenuTree, edit: &ContentEdit) -> Result<(), MenuError> {
    let position = format!("{}/{}", edit.category_index, edit.item_index);
    let item = tree
        .categories
        .get(edit.category_index)
        .and_then(|c| c.items.get(edit.item_index))
        .ok_or_else(|| MenuError::ItemNotFound(position.clone()))?;

    if let Some(expected) = &edit.id
        && *expected != item.id
    {
        return Err(MenuError::ItemMismatch {
            position,
            expected: expected.clone(),
            found: item.id.clone(),
        });
    }

    if edit.name.trim().is_empty() {
        return Err(MenuError::ValidationMissing(format!(
            "name required at {}",
            position
        )));
    }
    Ok(())
}

/// Apply `edits` to `tree` in memory. Returns the number of items changed.
pub fn apply_edits(tree: &mut MenuTree, edits: &[ContentEdit]) -> Result<usize, MenuError> {
    for edit in edits {
        check(tree, edit)?;
    }

    let mut changed = 0;
    for edit in edits {
        let Some(item) = tree
            .categories
            .get_mut(edit.category_index)
            .and_then(|c| c.items.get_mut(edit.item_index))
        else {
            continue;
        };

        let description = edit
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        if item.name != edit.name || item.description != description {
            item.name = edit.name.clone();
            item.description = description;
            changed += 1;
        }
    }
    Ok(changed)
}
