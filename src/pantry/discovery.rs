//! Descriptor discovery: scan configured paths for ingredient files.
//!
//! A JSON file qualifies as a descriptor when it carries {id, name,
//! version, category}. Category may be omitted, in which case the
//! immediate parent directory name is tried, falling back to `task`.
//! Files that fail to parse are skipped, never fatal. Output is sorted
//! by id so two scans of an unchanged tree produce identical results.

use crate::ingredient::{Category, Ingredient};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One discovered descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryResult {
    pub ingredient: Ingredient,
    pub file_path: PathBuf,
}

/// Recursively scan every configured path for ingredient descriptors.
///
/// Unreadable or missing paths are logged and skipped, never fatal.
pub fn discover(paths: &[PathBuf]) -> Vec<DiscoveryResult> {
    let mut results = Vec::new();

    for path in paths {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "discovery path does not exist, skipping");
            continue;
        }
        scan_directory(path, &mut results);
    }

    results.sort_by(|a, b| a.ingredient.id.cmp(&b.ingredient.id));
    results
}

fn scan_directory(dir: &Path, results: &mut Vec<DiscoveryResult>) {
    for entry in WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|e| e != "json") {
            continue;
        }
        match analyze_file(path) {
            Some(ingredient) => results.push(DiscoveryResult {
                ingredient,
                file_path: path.to_path_buf(),
            }),
            None => {
                tracing::debug!(file = %path.display(), "not an ingredient descriptor, skipping");
            }
        }
    }
}

/// Parse a candidate file into an ingredient, or `None` if it is not a
/// descriptor. Required fields: id, name, version; category is derived
/// when absent.
fn analyze_file(path: &Path) -> Option<Ingredient> {
    let content = std::fs::read_to_string(path).ok()?;
    let value: serde_json::Value = serde_json::from_str(&content).ok()?;
    let obj = value.as_object()?;

    // A descriptor must at least identify itself
    if !["id", "name", "version"].iter().all(|f| obj.contains_key(*f)) {
        return None;
    }

    let category = obj
        .get("category")
        .and_then(|v| v.as_str())
        .and_then(Category::from_name)
        .or_else(|| category_from_parent(path))
        .unwrap_or(Category::Task);

    // Re-parse through the typed model so defaults and timestamps apply
    let mut patched = value.clone();
    patched["category"] = serde_json::Value::String(category.as_str().to_string());
    serde_json::from_value(patched).ok()
}

fn category_from_parent(path: &Path) -> Option<Category> {
    path.parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .and_then(Category::from_name)
}
