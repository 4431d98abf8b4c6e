//! Addon list parsing and merging for standard PhoneID calls.
//!
//! Addons come from a comma/semicolon separated flag and/or a JSON file, and
//! are merged with the built-in defaults. Order of first appearance wins.

use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::PhoneIdError;
use crate::types::DEFAULT_ADDONS;

/// Parse custom addons from the CLI string and an optional JSON file.
///
/// The file must hold either a JSON array or an object with an `addons`
/// array. Entries are trimmed, empties dropped, duplicates removed.
pub fn parse_addons(
    addons_arg: Option<&str>,
    addons_file: Option<&Path>,
) -> Result<Vec<String>, PhoneIdError> {
    let mut addons = Vec::new();

    if let Some(arg) = addons_arg {
        addons.extend(split_addon_list(arg));
    }

    if let Some(path) = addons_file {
        addons.extend(read_addons_file(path)?);
    }

    Ok(dedupe_preserving_order(addons))
}

/// Split `"a, b;c"` into `["a", "b", "c"]`.
pub fn split_addon_list(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load addon names from a JSON file.
pub fn read_addons_file(path: &Path) -> Result<Vec<String>, PhoneIdError> {
    let content = fs::read_to_string(path).map_err(|e| {
        PhoneIdError::file_error(
            path.to_string_lossy(),
            format!("Failed to read addons file: {}", e),
        )
    })?;

    let data: Value = serde_json::from_str(&content).map_err(|e| {
        PhoneIdError::file_error(path.to_string_lossy(), format!("Invalid JSON: {}", e))
    })?;

    let entries = match &data {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("addons") {
            Some(Value::Array(items)) => items,
            _ => return Err(invalid_addons_file()),
        },
        _ => return Err(invalid_addons_file()),
    };

    Ok(entries
        .iter()
        .map(|item| match item {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string().trim().to_string(),
        })
        .filter(|s| !s.is_empty())
        .collect())
}

/// Final addon list for a standard call: defaults first (when enabled), then
/// custom addons, without duplicates.
pub fn merge_addons(custom: &[String], include_defaults: bool) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    if include_defaults {
        merged.extend(DEFAULT_ADDONS.iter().map(|a| a.to_string()));
    }
    merged.extend(custom.iter().cloned());
    dedupe_preserving_order(merged)
}

pub fn dedupe_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

fn invalid_addons_file() -> PhoneIdError {
    PhoneIdError::config("addons-file must be a JSON array or an object with an 'addons' array")
}
