//! Test fixtures - sample recipes and descriptors.

#![allow(dead_code)]

/// Two-step arithmetic recipe chaining outputs through the context.
pub const CHAINED_MATH_RECIPE: &str = r#"{
    "name": "chained-math",
    "description": "Add, then add again using the previous output",
    "required_tools": ["math.add"],
    "input_data": {"base": 5},
    "steps": [
        {"name": "first", "ingredient": "math.add",
         "params": {"a": "{{data.base}}", "b": 10}},
        {"name": "second", "ingredient": "math.add",
         "params": {"a": "{{steps.first.output}}", "b": 7}}
    ]
}"#;

/// First step fails with the default abort policy.
pub const ABORTING_RECIPE: &str = r#"{
    "name": "aborting",
    "description": "Unknown ingredient halts the run",
    "steps": [
        {"name": "broken", "ingredient": "tool.missing"},
        {"name": "unreached", "ingredient": "math.add", "params": {"a": 1, "b": 2}}
    ]
}"#;

/// First step fails but is marked continue.
pub const TOLERANT_RECIPE: &str = r#"{
    "name": "tolerant",
    "description": "Failure is recorded, remaining steps still run",
    "steps": [
        {"name": "broken", "ingredient": "tool.missing", "on_failure": "continue"},
        {"name": "reached", "ingredient": "math.multiply", "params": {"a": 3, "b": 4}}
    ]
}"#;

/// Recipe missing its description field.
pub const INVALID_RECIPE: &str = r#"{
    "name": "invalid",
    "steps": []
}"#;

/// A complete descriptor with an explicit category.
pub const TOOL_DESCRIPTOR: &str = r#"{
    "id": "tool.thumbnail",
    "name": "Thumbnail Maker",
    "description": "Generates thumbnails",
    "version": "2.1.0",
    "category": "tool",
    "tags": ["images"],
    "author": "galley"
}"#;

/// A descriptor with no category field; the parent directory decides.
pub const UNCATEGORIZED_DESCRIPTOR: &str = r#"{
    "id": "skill.summarize",
    "name": "Summarizer",
    "description": "Summarizes text",
    "version": "1.0.0",
    "tags": ["text"],
    "author": "galley"
}"#;

/// Not an ingredient descriptor at all.
pub const UNRELATED_JSON: &str = r#"{"setting": true, "count": 3}"#;
