//! Recipe model and parser.
//!
//! A recipe is a JSON workflow document: an ordered list of steps, each
//! referencing an ingredient by id with a parameter map and a failure
//! policy. Recipes are parsed fresh for every invocation; a document
//! that fails schema checks aborts the run before any step executes.

use crate::error::{GalleyError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Per-step failure policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnFailure {
    #[default]
    Abort,
    Continue,
}

/// One recipe entry: an ingredient reference, parameters, and a policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    /// Id of the ingredient to invoke.
    pub ingredient: String,
    /// Parameter values; strings of the form `{{ path }}` are resolved
    /// against the execution context at run time.
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub on_failure: OnFailure,
}

/// A parsed workflow document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub description: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub steps: Vec<Step>,
    /// Ingredient ids the context builder preloads for this run.
    #[serde(default)]
    pub required_tools: Vec<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub required_modules: Vec<String>,
    /// Raw input payload exposed to steps under `data.*`.
    #[serde(default)]
    pub input_data: BTreeMap<String, Value>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl Recipe {
    /// Load and validate a recipe file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GalleyError::RecipeParse {
            path: path.display().to_string(),
            reason: format!("cannot read file: {e}"),
        })?;
        Self::from_str_named(&content, &path.display().to_string())
    }

    /// Parse a recipe from a JSON string.
    pub fn from_str_named(content: &str, source: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| GalleyError::RecipeParse {
                path: source.to_string(),
                reason: format!("invalid JSON: {e}"),
            })?;

        // Field-level checks first so the error names what is missing
        // instead of surfacing a generic serde message.
        let parse_err = |reason: String| GalleyError::RecipeParse {
            path: source.to_string(),
            reason,
        };

        let obj = value
            .as_object()
            .ok_or_else(|| parse_err("recipe must be a JSON object".into()))?;
        for field in ["name", "description", "steps"] {
            if !obj.contains_key(field) {
                return Err(parse_err(format!("missing required field: {field}")));
            }
        }

        let steps = obj["steps"]
            .as_array()
            .ok_or_else(|| parse_err("'steps' must be an array".into()))?;
        for (i, step) in steps.iter().enumerate() {
            let step_obj = step
                .as_object()
                .ok_or_else(|| parse_err(format!("step {i} must be an object")))?;
            for field in ["name", "ingredient"] {
                if !step_obj.contains_key(field) {
                    return Err(parse_err(format!("step {i} missing '{field}' field")));
                }
            }
            if let Some(policy) = step_obj.get("on_failure")
                && !matches!(policy.as_str(), Some("abort") | Some("continue"))
            {
                return Err(parse_err(format!(
                    "step {i}: on_failure must be 'abort' or 'continue', got {policy}"
                )));
            }
        }

        let recipe: Recipe = serde_json::from_value(value).map_err(|e| GalleyError::RecipeParse {
            path: source.to_string(),
            reason: e.to_string(),
        })?;

        // Step names key the context namespace, so duplicates would
        // silently overwrite each other's outputs.
        let mut seen = HashSet::new();
        for step in &recipe.steps {
            if !seen.insert(step.name.as_str()) {
                return Err(parse_err(format!("duplicate step name: {}", step.name)));
            }
        }

        tracing::debug!(recipe = %recipe.name, steps = recipe.steps.len(), "recipe parsed");
        Ok(recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "name": "demo",
        "description": "a demo recipe",
        "version": "1.0.1",
        "steps": [
            {"name": "s1", "ingredient": "console.print", "params": {"message": "hi"}},
            {"name": "s2", "ingredient": "tool.list", "on_failure": "continue"}
        ]
    }"#;

    #[test]
    fn test_parse_valid_recipe() {
        let recipe = Recipe::from_str_named(VALID, "test").unwrap();
        assert_eq!(recipe.name, "demo");
        assert_eq!(recipe.steps.len(), 2);
        assert_eq!(recipe.steps[0].on_failure, OnFailure::Abort);
        assert_eq!(recipe.steps[1].on_failure, OnFailure::Continue);
    }

    #[test]
    fn test_version_defaults() {
        let json = r#"{"name": "n", "description": "d", "steps": []}"#;
        let recipe = Recipe::from_str_named(json, "test").unwrap();
        assert_eq!(recipe.version, "1.0.0");
    }

    #[test]
    fn test_missing_top_level_field() {
        let json = r#"{"name": "n", "steps": []}"#;
        let err = Recipe::from_str_named(json, "test").unwrap_err();
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_missing_step_ingredient() {
        let json = r#"{"name": "n", "description": "d", "steps": [{"name": "s1"}]}"#;
        let err = Recipe::from_str_named(json, "test").unwrap_err();
        assert!(err.to_string().contains("ingredient"));
    }

    #[test]
    fn test_invalid_on_failure_policy() {
        let json = r#"{"name": "n", "description": "d",
            "steps": [{"name": "s1", "ingredient": "x.y", "on_failure": "retry"}]}"#;
        let err = Recipe::from_str_named(json, "test").unwrap_err();
        assert!(err.to_string().contains("on_failure"));
    }

    #[test]
    fn test_malformed_json() {
        let err = Recipe::from_str_named("{\"name\": ", "test").unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_duplicate_step_names_rejected() {
        let json = r#"{"name": "n", "description": "d", "steps": [
            {"name": "s1", "ingredient": "a.b"},
            {"name": "s1", "ingredient": "c.d"}
        ]}"#;
        let err = Recipe::from_str_named(json, "test").unwrap_err();
        assert!(err.to_string().contains("duplicate step name"));
    }

    #[test]
    fn test_requirements_and_input_data() {
        let json = r#"{
            "name": "n", "description": "d",
            "required_tools": ["tool.image"],
            "input_data": {"topic": "ai"},
            "steps": []
        }"#;
        let recipe = Recipe::from_str_named(json, "test").unwrap();
        assert_eq!(recipe.required_tools, vec!["tool.image"]);
        assert_eq!(recipe.input_data["topic"], "ai");
    }

    #[test]
    fn test_file_not_found() {
        let err = Recipe::from_path(Path::new("/no/such/recipe.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read file"));
    }
}
