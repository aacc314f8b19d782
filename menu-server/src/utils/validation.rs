//! Input validation helpers
//!
//! Centralized text length constants and validation functions used by the
//! HTTP handlers before anything reaches the menu service.

use std::collections::HashMap;

use shared::client::PriceInput;
use shared::models::{MenuTree, PricePair};

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Language codes ("es", "pt-br", ...)
pub const MAX_LANGUAGE_CODE_LEN: usize = 16;

/// Item, option, category names
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions and notes
pub const MAX_NOTE_LEN: usize = 1000;

/// Usernames
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required_field(field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Language codes are short ASCII tokens: letters, digits, `-` and `_`
pub fn validate_language_code(lang: &str) -> Result<(), AppError> {
    validate_required_text(lang, "lang", MAX_LANGUAGE_CODE_LEN)?;
    if !lang
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::with_message(
            shared::ErrorCode::InvalidFormat,
            format!("Invalid language code: {lang}"),
        )
        .with_detail("lang", lang));
    }
    Ok(())
}

/// Turn a price update body into price pairs
///
/// The mapping must be non-empty and every entry needs a non-blank `final`.
/// Nothing is returned unless the whole body is valid.
pub fn validate_price_inputs(
    prices: HashMap<String, PriceInput>,
) -> Result<HashMap<String, PricePair>, AppError> {
    if prices.is_empty() {
        return Err(AppError::required_field("prices"));
    }

    let mut pairs = HashMap::with_capacity(prices.len());
    for (key, input) in prices {
        validate_required_text(&key, "price key", MAX_NAME_LEN)?;
        let final_price = match input.final_price {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                return Err(AppError::required_field("final").with_detail("key", key.as_str()));
            }
        };
        validate_required_text(&final_price, "final", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&input.base, "base", MAX_SHORT_TEXT_LEN)?;
        pairs.insert(
            key,
            PricePair {
                base: input.base,
                final_price,
            },
        );
    }
    Ok(pairs)
}

/// Validate the text fields of a whole menu document
pub fn validate_menu_tree(tree: &MenuTree) -> Result<(), AppError> {
    for category in &tree.categories {
        validate_required_text(&category.name, "category name", MAX_NAME_LEN)?;
        validate_optional_text(&category.note, "category note", MAX_NOTE_LEN)?;
        for sub in &category.subcategories {
            validate_required_text(&sub.name, "subcategory name", MAX_NAME_LEN)?;
        }
    }
    for (item, path) in tree.items() {
        validate_required_text(&item.name, &format!("item name at {path}"), MAX_NAME_LEN)?;
        validate_optional_text(&item.description, "item description", MAX_NOTE_LEN)?;
    }
    for (option, path) in tree.options() {
        validate_required_text(&option.name, &format!("option name at {path}"), MAX_NAME_LEN)?;
    }
    Ok(())
}
