//! Ingredient validation rules and compliance reporting.
//!
//! Each rule yields either an error (blocks registration) or a warning
//! (recorded, never blocking). Results are plain data; nothing here
//! returns `Err` for a rule violation.

use crate::ingredient::Ingredient;
use crate::pantry::store::IngredientStore;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of validating one ingredient.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub ingredient_id: String,
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate compliance metrics over the whole store.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary {
    pub total_ingredients: usize,
    pub valid_ingredients: usize,
    pub invalid_ingredients: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    /// valid / total, 0.0 for an empty store.
    pub validation_rate: f64,
}

/// Check a candidate record against the structural and semantic rules.
///
/// Dependency existence is checked against `store`; a dangling reference
/// is a warning only (it becomes a hard conflict when actually resolved).
pub fn validate_ingredient(ingredient: &Ingredient, store: &IngredientStore) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if ingredient.id.is_empty() {
        errors.push("missing ingredient id".to_string());
    } else if !is_valid_id(&ingredient.id) {
        errors.push(format!("invalid ingredient id format: {}", ingredient.id));
    }

    if ingredient.name.is_empty() {
        errors.push("missing ingredient name".to_string());
    }

    if ingredient.version.is_empty() {
        errors.push("missing ingredient version".to_string());
    } else if !is_valid_version(&ingredient.version) {
        errors.push(format!("invalid version format: {}", ingredient.version));
    }

    if ingredient.description.is_empty() {
        warnings.push("missing ingredient description".to_string());
    }

    if ingredient.author.is_empty() {
        warnings.push("missing ingredient author".to_string());
    }

    for dep in &ingredient.dependencies {
        if !store.contains(dep) {
            warnings.push(format!("missing dependency: {dep}"));
        }
    }

    if ingredient.tags.is_empty() {
        warnings.push("no tags specified".to_string());
    }

    ValidationResult {
        ingredient_id: ingredient.id.clone(),
        valid: errors.is_empty(),
        errors,
        warnings,
        timestamp: Utc::now(),
    }
}

/// Validate every ingredient currently in the store.
pub fn validate_all(store: &IngredientStore) -> Vec<ValidationResult> {
    store
        .list(None)
        .into_iter()
        .map(|i| validate_ingredient(i, store))
        .collect()
}

/// Aggregate `validate_all` into a compliance summary.
pub fn summary(store: &IngredientStore) -> ValidationSummary {
    let results = validate_all(store);
    let total = results.len();
    let valid = results.iter().filter(|r| r.valid).count();

    ValidationSummary {
        total_ingredients: total,
        valid_ingredients: valid,
        invalid_ingredients: total - valid,
        total_errors: results.iter().map(|r| r.errors.len()).sum(),
        total_warnings: results.iter().map(|r| r.warnings.len()).sum(),
        validation_rate: if total > 0 {
            valid as f64 / total as f64
        } else {
            0.0
        },
    }
}

/// Id convention: lowercase ASCII, at least one separating dot, no
/// whitespace, only alphanumerics plus `.`, `_`, `-`.
///
/// Purely numeric segments are accepted (`tool.v2` and `tool.2` are both
/// fine); non-ASCII identifiers are rejected.
fn is_valid_id(id: &str) -> bool {
    id.contains('.')
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
}

/// Version convention: at least two dot-separated integer components.
fn is_valid_version(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() >= 2
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient::Category;
    use tempfile::TempDir;

    fn store() -> (TempDir, IngredientStore) {
        let dir = TempDir::new().unwrap();
        let store = IngredientStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn complete(id: &str) -> Ingredient {
        let mut ing = Ingredient::new(id, "Thing", "1.2.3", Category::Tool).with_tags(&["misc"]);
        ing.description = "does a thing".into();
        ing.author = "galley".into();
        ing
    }

    #[test]
    fn test_valid_ingredient_passes_clean() {
        let (_dir, store) = store();
        let result = validate_ingredient(&complete("tool.thing"), &store);
        assert!(result.valid, "errors: {:?}", result.errors);
        assert!(result.warnings.is_empty(), "warnings: {:?}", result.warnings);
    }

    #[test]
    fn test_uppercase_id_rejected() {
        let (_dir, store) = store();
        let result = validate_ingredient(&complete("Tool.Thing"), &store);
        assert!(!result.valid);
        assert!(result.errors[0].contains("invalid ingredient id"));
    }

    #[test]
    fn test_id_with_space_rejected() {
        let (_dir, store) = store();
        let result = validate_ingredient(&complete("tool.my thing"), &store);
        assert!(!result.valid);
    }

    #[test]
    fn test_id_without_dot_rejected() {
        let (_dir, store) = store();
        let result = validate_ingredient(&complete("standalone"), &store);
        assert!(!result.valid);
    }

    #[test]
    fn test_numeric_segments_accepted() {
        let (_dir, store) = store();
        assert!(validate_ingredient(&complete("tool.2"), &store).valid);
    }

    #[test]
    fn test_non_ascii_id_rejected() {
        let (_dir, store) = store();
        assert!(!validate_ingredient(&complete("tool.útil"), &store).valid);
    }

    #[test]
    fn test_version_rules() {
        let (_dir, store) = store();

        let mut ing = complete("tool.thing");
        ing.version = "1".into();
        assert!(!validate_ingredient(&ing, &store).valid);

        ing.version = "1.x".into();
        assert!(!validate_ingredient(&ing, &store).valid);

        ing.version = "1.0".into();
        assert!(validate_ingredient(&ing, &store).valid);

        ing.version = "1.0.3.7".into();
        assert!(validate_ingredient(&ing, &store).valid);
    }

    #[test]
    fn test_missing_optionals_warn_only() {
        let (_dir, store) = store();
        // No description, author, or tags
        let ing = Ingredient::new("tool.bare", "Bare", "1.0", Category::Tool);
        let result = validate_ingredient(&ing, &store);
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 3);
    }

    #[test]
    fn test_dangling_dependency_warns() {
        let (_dir, store) = store();
        let ing = complete("tool.thing").with_dependencies(&["tool.ghost"]);
        let result = validate_ingredient(&ing, &store);
        assert!(result.valid);
        assert!(result.warnings.iter().any(|w| w.contains("tool.ghost")));
    }

    #[test]
    fn test_summary_rate() {
        let (_dir, mut s) = store();
        s.insert(complete("tool.good")).unwrap();
        let mut bad = complete("tool.bad");
        bad.version = "nope".into();
        s.insert(bad).unwrap();

        let sum = summary(&s);
        assert_eq!(sum.total_ingredients, 2);
        assert_eq!(sum.valid_ingredients, 1);
        assert_eq!(sum.invalid_ingredients, 1);
        assert!((sum.validation_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_empty_store() {
        let (_dir, s) = store();
        let sum = summary(&s);
        assert_eq!(sum.total_ingredients, 0);
        assert_eq!(sum.validation_rate, 0.0);
    }
}
