//! Common test utilities for integration tests.

#![allow(dead_code)]

mod fixtures;

pub use fixtures::*;

use galley::{Category, Ingredient, Pantry};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary pantry pre-seeded with a small ingredient set.
pub fn seeded_pantry() -> (TempDir, Pantry) {
    let dir = TempDir::new().unwrap();
    let mut pantry = Pantry::open(dir.path()).unwrap();

    for (id, category, deps, tags) in [
        ("tool.image", Category::Tool, vec![], vec!["images"]),
        ("tool.resize", Category::Tool, vec!["tool.image"], vec!["images"]),
        ("skill.writer", Category::Skill, vec![], vec!["text"]),
        (
            "task.publish",
            Category::Task,
            vec!["tool.resize", "skill.writer"],
            vec!["publishing"],
        ),
    ] {
        let mut ing = Ingredient::new(id, id, "1.0.0", category)
            .with_dependencies(&deps)
            .with_tags(&tags);
        ing.description = format!("the {id} ingredient");
        ing.author = "galley".into();
        assert!(pantry.register(ing).unwrap(), "fixture {id} must register");
    }

    (dir, pantry)
}

/// Write a recipe document into `dir` and return its path.
pub fn write_recipe(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(format!("{name}.json"));
    std::fs::write(&path, content).unwrap();
    path
}

/// Write an ingredient descriptor JSON file under `dir`.
pub fn write_descriptor(dir: &Path, file_name: &str, content: &str) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(file_name);
    std::fs::write(&path, content).unwrap();
    path
}
