//! Ingredient metadata model.
//!
//! An ingredient is a registered, addressable unit of executable capability.
//! Identity is a dotted hierarchical id (`tool.file_utils`); the metadata is
//! conceptually immutable per version, and re-registering under the same id
//! overwrites the previous record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ingredient categories, mirroring the pantry directory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Task,
    Tool,
    Module,
    Skill,
    Config,
    Schema,
}

impl Category {
    /// Parse a category from a directory or descriptor name.
    ///
    /// Accepts both singular and plural forms since pantry directories are
    /// conventionally plural (`tools/`, `skills/`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim_end_matches('s') {
            "task" => Some(Category::Task),
            "tool" => Some(Category::Tool),
            "module" => Some(Category::Module),
            "skill" => Some(Category::Skill),
            "config" => Some(Category::Config),
            // "schemas" loses its trailing s above
            "schema" => Some(Category::Schema),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Task => "task",
            Category::Tool => "tool",
            Category::Module => "module",
            Category::Skill => "skill",
            Category::Config => "config",
            Category::Schema => "schema",
        }
    }
}

/// Visibility tier on an ingredient. The derive order gives
/// `Public < Protected < Admin`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    #[default]
    Public,
    Protected,
    Admin,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Public => "public",
            AccessLevel::Protected => "protected",
            AccessLevel::Admin => "admin",
        }
    }
}

/// A registered ingredient record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
    pub category: Category,
    /// Ordered set of ingredient ids this one depends on. Dangling
    /// references are a validation warning, not a registration error.
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated: DateTime<Utc>,
    #[serde(default)]
    pub access_level: AccessLevel,
}

impl Ingredient {
    /// Minimal constructor used by tests and discovery fallbacks.
    pub fn new(id: &str, name: &str, version: &str, category: Category) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            version: version.to_string(),
            category,
            dependencies: Vec::new(),
            tags: Vec::new(),
            author: String::new(),
            created: now,
            updated: now,
            access_level: AccessLevel::Public,
        }
    }

    pub fn with_dependencies(mut self, deps: &[&str]) -> Self {
        self.dependencies = deps.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn with_access_level(mut self, level: AccessLevel) -> Self {
        self.access_level = level;
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_name() {
        assert_eq!(Category::from_name("tools"), Some(Category::Tool));
        assert_eq!(Category::from_name("tool"), Some(Category::Tool));
        assert_eq!(Category::from_name("skills"), Some(Category::Skill));
        assert_eq!(Category::from_name("schemas"), Some(Category::Schema));
        assert_eq!(Category::from_name("misc"), None);
    }

    #[test]
    fn test_access_level_ordering() {
        assert!(AccessLevel::Public < AccessLevel::Protected);
        assert!(AccessLevel::Protected < AccessLevel::Admin);
    }

    #[test]
    fn test_ingredient_roundtrip() {
        let ing = Ingredient::new("tool.file_utils", "File Utils", "1.0.0", Category::Tool)
            .with_dependencies(&["tool.base"])
            .with_tags(&["files"]);

        let json = serde_json::to_string(&ing).unwrap();
        assert!(json.contains("\"category\":\"tool\""));
        assert!(json.contains("\"access_level\":\"public\""));

        let back: Ingredient = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ing);
    }

    #[test]
    fn test_descriptor_defaults() {
        // Descriptors may omit optional fields entirely
        let json = r#"{"id": "task.noop", "name": "Noop", "version": "1.0", "category": "task"}"#;
        let ing: Ingredient = serde_json::from_str(json).unwrap();
        assert!(ing.dependencies.is_empty());
        assert_eq!(ing.access_level, AccessLevel::Public);
    }
}
