//! The pantry: ingredient metadata store plus the subsystems built on it.
//!
//! `Pantry` is the facade the orchestrator talks to. It owns the backing
//! store and composes discovery, validation, dependency tracking, and
//! access control into one API surface. It is an explicit instance passed
//! by reference through the call chain; there is no global registry.

pub mod access;
pub mod deps;
pub mod discovery;
pub mod store;
pub mod validation;

use crate::error::Result;
use crate::ingredient::{Category, Ingredient};
use serde::Serialize;
use std::path::{Path, PathBuf};

use access::Permission;
use deps::{Conflict, DependencyInfo};
use discovery::DiscoveryResult;
use store::IngredientStore;
use validation::{ValidationResult, ValidationSummary};

/// A scored match from `Pantry::search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub ingredient: Ingredient,
    pub relevance_score: f64,
}

pub struct Pantry {
    store: IngredientStore,
}

impl Pantry {
    /// Open the pantry rooted at `root`, acquiring the writer lock.
    pub fn open(root: &Path) -> Result<Self> {
        Ok(Self {
            store: IngredientStore::open(root)?,
        })
    }

    /// Validate and register an ingredient.
    ///
    /// Returns `Ok(true)` when the record was persisted, `Ok(false)` when
    /// validation errors blocked it. Warnings are logged but do not block.
    /// Persistence failure is an `Err`, never a panic.
    pub fn register(&mut self, ingredient: Ingredient) -> Result<bool> {
        let result = validation::validate_ingredient(&ingredient, &self.store);
        for warning in &result.warnings {
            tracing::warn!(ingredient = %ingredient.id, "{warning}");
        }
        if !result.valid {
            tracing::error!(
                ingredient = %ingredient.id,
                errors = ?result.errors,
                "registration rejected"
            );
            return Ok(false);
        }

        self.store.insert(ingredient)?;
        Ok(true)
    }

    pub fn get(&self, id: &str) -> Option<&Ingredient> {
        self.store.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.store.contains(id)
    }

    pub fn list(&self, category: Option<Category>) -> Vec<&Ingredient> {
        self.store.list(category)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Run discovery over `paths` and register everything that validates.
    /// Returns the raw discovery results regardless of registration
    /// outcome.
    pub fn discover_and_register(&mut self, paths: &[PathBuf]) -> Result<Vec<DiscoveryResult>> {
        let results = discovery::discover(paths);
        let mut registered = 0usize;
        for result in &results {
            if self.register(result.ingredient.clone())? {
                registered += 1;
            }
        }
        tracing::info!(
            discovered = results.len(),
            registered,
            "ingredient discovery complete"
        );
        Ok(results)
    }

    /// Search name, description, and tags. Name matches score highest,
    /// then tags, then description; results come back in descending
    /// relevance order.
    pub fn search(&self, query: &str, category: Option<Category>) -> Vec<SearchResult> {
        let needle = query.to_lowercase();
        let mut results: Vec<SearchResult> = self
            .store
            .list(category)
            .into_iter()
            .filter_map(|ingredient| {
                let mut score = 0.0;
                if ingredient.name.to_lowercase().contains(&needle) {
                    score += 10.0;
                }
                if ingredient.description.to_lowercase().contains(&needle) {
                    score += 5.0;
                }
                if ingredient
                    .tags
                    .iter()
                    .any(|t| t.to_lowercase().contains(&needle))
                {
                    score += 8.0;
                }
                (score > 0.0).then(|| SearchResult {
                    ingredient: ingredient.clone(),
                    relevance_score: score,
                })
            })
            .collect();

        results.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        results
    }

    /// All ingredients carrying `tag` (case-insensitive).
    pub fn list_by_tag(&self, tag: &str) -> Vec<&Ingredient> {
        let tag = tag.to_lowercase();
        self.store
            .list(None)
            .into_iter()
            .filter(|i| i.tags.iter().any(|t| t.to_lowercase() == tag))
            .collect()
    }

    // Dependency tracking

    pub fn get_dependencies(&self, id: &str) -> Vec<String> {
        deps::get_dependencies(&self.store, id)
    }

    pub fn get_dependents(&self, id: &str) -> Vec<String> {
        deps::get_dependents(&self.store, id)
    }

    pub fn resolve_dependencies(&self, id: &str) -> Vec<String> {
        deps::resolve_dependencies(&self.store, id)
    }

    pub fn check_conflicts(&self, id: &str) -> Vec<Conflict> {
        deps::check_conflicts(&self.store, id)
    }

    pub fn dependency_info(&self, id: &str) -> Option<DependencyInfo> {
        deps::dependency_info(&self.store, id)
    }

    // Access control

    pub fn can_access(&self, user_id: &str, ingredient_id: &str, permission: Permission) -> bool {
        access::can_access(&self.store, user_id, ingredient_id, permission)
    }

    pub fn accessible_ingredients(&self, user_id: &str, permission: Permission) -> Vec<&Ingredient> {
        access::accessible_ingredients(&self.store, user_id, permission)
    }

    // Validation

    pub fn validate(&self, ingredient: &Ingredient) -> ValidationResult {
        validation::validate_ingredient(ingredient, &self.store)
    }

    pub fn validate_all(&self) -> Vec<ValidationResult> {
        validation::validate_all(&self.store)
    }

    pub fn validation_summary(&self) -> ValidationSummary {
        validation::summary(&self.store)
    }
}
