//! Dependency resolution and conflict tracking over the ingredient store.
//!
//! Resolution is a post-order depth-first traversal with a visited set:
//! dependencies come before dependents and the target itself is excluded
//! from the result. Cycles do not make resolution fail — the visited set
//! keeps the walk finite — they are reported by `check_conflicts` instead.

use crate::pantry::store::IngredientStore;
use serde::Serialize;
use std::collections::HashSet;

/// A detected dependency conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Conflict {
    /// The ingredient is reachable from its own dependencies.
    Cycle { ingredient_id: String },
    /// A direct dependency is absent from the store.
    Missing { dependency: String },
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Conflict::Cycle { ingredient_id } => {
                write!(f, "circular dependency detected for {ingredient_id}")
            }
            Conflict::Missing { dependency } => write!(f, "missing dependency: {dependency}"),
        }
    }
}

/// Full dependency picture for one ingredient.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyInfo {
    pub ingredient_id: String,
    pub dependencies: Vec<String>,
    pub dependents: Vec<String>,
    pub conflicts: Vec<Conflict>,
}

/// Direct dependencies of an ingredient; empty if unknown.
pub fn get_dependencies(store: &IngredientStore, id: &str) -> Vec<String> {
    store
        .get(id)
        .map(|i| i.dependencies.clone())
        .unwrap_or_default()
}

/// Reverse lookup: every registered ingredient that lists `id` as a
/// direct dependency.
pub fn get_dependents(store: &IngredientStore, id: &str) -> Vec<String> {
    store
        .list(None)
        .into_iter()
        .filter(|i| i.dependencies.iter().any(|d| d == id))
        .map(|i| i.id.clone())
        .collect()
}

/// All transitive dependencies of `id`, topologically ordered
/// (dependency before dependent). The target itself is excluded.
pub fn resolve_dependencies(store: &IngredientStore, id: &str) -> Vec<String> {
    let mut visited = HashSet::new();
    let mut order = Vec::new();
    visited.insert(id.to_string());
    for dep in get_dependencies(store, id) {
        post_order(store, &dep, &mut visited, &mut order);
    }
    order
}

/// Report cycle and missing-link conflicts for `id`.
pub fn check_conflicts(store: &IngredientStore, id: &str) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    // Walk the closure of the direct dependencies without seeding the
    // target into the visited set; if the walk reaches the target again,
    // the graph has a cycle through it.
    let mut visited = HashSet::new();
    let mut closure = Vec::new();
    for dep in get_dependencies(store, id) {
        post_order(store, &dep, &mut visited, &mut closure);
    }
    if closure.iter().any(|d| d == id) {
        conflicts.push(Conflict::Cycle {
            ingredient_id: id.to_string(),
        });
    }

    for dep in get_dependencies(store, id) {
        if !store.contains(&dep) {
            conflicts.push(Conflict::Missing { dependency: dep });
        }
    }

    conflicts
}

/// Dependencies, dependents, and conflicts for `id`, or `None` if the
/// ingredient is not registered.
pub fn dependency_info(store: &IngredientStore, id: &str) -> Option<DependencyInfo> {
    store.get(id)?;
    Some(DependencyInfo {
        ingredient_id: id.to_string(),
        dependencies: get_dependencies(store, id),
        dependents: get_dependents(store, id),
        conflicts: check_conflicts(store, id),
    })
}

fn post_order(
    store: &IngredientStore,
    id: &str,
    visited: &mut HashSet<String>,
    order: &mut Vec<String>,
) {
    if !visited.insert(id.to_string()) {
        return;
    }
    for dep in get_dependencies(store, id) {
        post_order(store, &dep, visited, order);
    }
    order.push(id.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient::{Category, Ingredient};
    use tempfile::TempDir;

    fn store_with(entries: &[(&str, &[&str])]) -> (TempDir, IngredientStore) {
        let dir = TempDir::new().unwrap();
        let mut store = IngredientStore::open(dir.path()).unwrap();
        for (id, deps) in entries {
            let ing = Ingredient::new(id, id, "1.0", Category::Tool).with_dependencies(deps);
            store.insert(ing).unwrap();
        }
        (dir, store)
    }

    #[test]
    fn test_direct_dependencies() {
        let (_d, store) = store_with(&[("tool.a", &["tool.b"]), ("tool.b", &[])]);
        assert_eq!(get_dependencies(&store, "tool.a"), vec!["tool.b"]);
        assert!(get_dependencies(&store, "tool.b").is_empty());
        assert!(get_dependencies(&store, "tool.ghost").is_empty());
    }

    #[test]
    fn test_dependents_reverse_lookup() {
        let (_d, store) = store_with(&[
            ("tool.base", &[]),
            ("tool.a", &["tool.base"]),
            ("tool.b", &["tool.base"]),
        ]);
        let deps = get_dependents(&store, "tool.base");
        assert_eq!(deps, vec!["tool.a", "tool.b"]);
    }

    #[test]
    fn test_resolve_dependency_order() {
        // a -> b -> c: c must precede b, b must precede a's position
        let (_d, store) = store_with(&[
            ("tool.a", &["tool.b"]),
            ("tool.b", &["tool.c"]),
            ("tool.c", &[]),
        ]);
        let resolved = resolve_dependencies(&store, "tool.a");
        assert_eq!(resolved, vec!["tool.c", "tool.b"]);
    }

    #[test]
    fn test_resolve_excludes_target() {
        let (_d, store) = store_with(&[("tool.a", &["tool.b"]), ("tool.b", &[])]);
        let resolved = resolve_dependencies(&store, "tool.a");
        assert!(!resolved.contains(&"tool.a".to_string()));
        assert!(resolved.contains(&"tool.b".to_string()));
    }

    #[test]
    fn test_resolve_diamond_no_duplicates() {
        let (_d, store) = store_with(&[
            ("tool.core", &[]),
            ("tool.left", &["tool.core"]),
            ("tool.right", &["tool.core"]),
            ("tool.app", &["tool.left", "tool.right"]),
        ]);
        let resolved = resolve_dependencies(&store, "tool.app");
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0], "tool.core");
        assert_eq!(
            resolved.iter().filter(|d| *d == "tool.core").count(),
            1
        );
    }

    #[test]
    fn test_self_cycle_reported() {
        let (_d, store) = store_with(&[("tool.a", &["tool.a"])]);
        let conflicts = check_conflicts(&store, "tool.a");
        assert!(conflicts.iter().any(|c| matches!(c, Conflict::Cycle { .. })));
    }

    #[test]
    fn test_indirect_cycle_reported() {
        let (_d, store) = store_with(&[
            ("tool.a", &["tool.b"]),
            ("tool.b", &["tool.c"]),
            ("tool.c", &["tool.a"]),
        ]);
        let conflicts = check_conflicts(&store, "tool.a");
        assert!(conflicts.iter().any(|c| matches!(c, Conflict::Cycle { .. })));
    }

    #[test]
    fn test_resolution_finishes_despite_cycle() {
        let (_d, store) = store_with(&[("tool.a", &["tool.b"]), ("tool.b", &["tool.a"])]);
        // Must terminate; visited set breaks the loop
        let resolved = resolve_dependencies(&store, "tool.a");
        assert!(resolved.contains(&"tool.b".to_string()));
    }

    #[test]
    fn test_missing_dependency_conflict() {
        let (_d, store) = store_with(&[("tool.a", &["tool.ghost"])]);
        let conflicts = check_conflicts(&store, "tool.a");
        assert_eq!(
            conflicts,
            vec![Conflict::Missing {
                dependency: "tool.ghost".to_string()
            }]
        );
    }

    #[test]
    fn test_clean_graph_has_no_conflicts() {
        let (_d, store) = store_with(&[("tool.a", &["tool.b"]), ("tool.b", &[])]);
        assert!(check_conflicts(&store, "tool.a").is_empty());
    }

    #[test]
    fn test_dependency_info() {
        let (_d, store) = store_with(&[
            ("tool.base", &[]),
            ("tool.app", &["tool.base"]),
        ]);
        let info = dependency_info(&store, "tool.base").unwrap();
        assert_eq!(info.dependents, vec!["tool.app"]);
        assert!(info.dependencies.is_empty());
        assert!(info.conflicts.is_empty());

        assert!(dependency_info(&store, "tool.ghost").is_none());
    }
}
