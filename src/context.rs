//! Per-run execution context.
//!
//! The context is a flat map from namespaced dotted keys to JSON values,
//! created fresh for each run and owned exclusively by it. The
//! orchestrator writes `steps.<name>.output` and `steps.<name>.success`
//! after every step; step parameters reference these keys through the
//! `{{ path }}` form resolved by the executor.

use crate::handlers::HandlerRegistry;
use crate::recipe::Recipe;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    values: BTreeMap<String, Value>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Record a step outcome under the `steps.<name>.*` namespace.
    pub fn record_step(&mut self, step_name: &str, output: Value, success: bool) {
        self.set(format!("steps.{step_name}.output"), output);
        self.set(format!("steps.{step_name}.success"), Value::Bool(success));
    }

    /// Drop every key not listed in `keep_keys`. Used by the orchestrator
    /// to bound context growth across long recipes.
    pub fn prune(&mut self, keep_keys: &[String]) {
        self.values.retain(|k, _| keep_keys.iter().any(|keep| keep == k));
    }

    /// Keys matching any of the given `prefix.` namespaces, for building
    /// a keep-list that preserves whole namespaces.
    pub fn keys_with_prefixes(&self, prefixes: &[&str]) -> Vec<String> {
        self.values
            .keys()
            .filter(|k| prefixes.iter().any(|p| k.starts_with(p)))
            .cloned()
            .collect()
    }
}

/// Assemble the minimal context for one run of `recipe`.
///
/// Exactly the declared requirement ids are loaded (as marker entries
/// under `ingredients.*`); ids with no registered handler are logged as
/// a warning, never a fatal error. The raw input payload lands under
/// `data.*`.
pub fn build_context(recipe: &Recipe, handlers: &HandlerRegistry) -> ExecutionContext {
    let mut ctx = ExecutionContext::new();

    for id in recipe
        .required_tools
        .iter()
        .chain(&recipe.required_skills)
        .chain(&recipe.required_modules)
    {
        if handlers.contains(id) {
            ctx.set(format!("ingredients.{id}"), Value::Bool(true));
        } else {
            tracing::warn!(ingredient = %id, "declared requirement has no registered handler");
        }
    }

    for (key, value) in &recipe.input_data {
        ctx.set(format!("data.{key}"), value.clone());
    }

    tracing::debug!(keys = ctx.len(), recipe = %recipe.name, "execution context built");
    ctx
}
