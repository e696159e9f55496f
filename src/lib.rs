//! Declarative workflow engine built around a pantry of ingredients.
//!
//! An *ingredient* is a capability (tool, skill, module, task) described
//! by a metadata record in the pantry and backed by a registered handler.
//! A *recipe* is a JSON document listing ordered steps, each invoking one
//! ingredient with a parameter map. The engine runs a recipe by building
//! a per-run context, executing steps strictly in order, and recording
//! every outcome.
//!
//! # Example Recipe
//!
//! ```json
//! {
//!   "name": "sum-and-report",
//!   "description": "Add two numbers and print the result",
//!   "required_tools": ["math.add", "console.print"],
//!   "input_data": {"base": 5},
//!   "steps": [
//!     {"name": "add", "ingredient": "math.add",
//!      "params": {"a": "{{data.base}}", "b": 10}},
//!     {"name": "report", "ingredient": "console.print",
//!      "params": {"message": "done"}, "on_failure": "continue"}
//!   ]
//! }
//! ```
//!
//! Step parameters of the form `{{ path }}` are resolved against the run
//! context; a step's output is available to later steps under
//! `steps.<name>.output`.
//!
//! # Failure policy
//!
//! Each step carries an `on_failure` policy: `abort` (default) halts the
//! run, `continue` records the failure and proceeds. The run record's
//! status distinguishes `Completed`, `CompletedWithFailures`, and
//! `Aborted`.

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod executor;
pub mod handlers;
pub mod ingredient;
pub mod output;
pub mod pantry;
pub mod recipe;

pub use config::GalleyConfig;
pub use context::ExecutionContext;
pub use engine::{KitchenEngine, RunRecord, RunStatus};
pub use error::{GalleyError, Result};
pub use executor::StepResult;
pub use handlers::{HandlerRegistry, IngredientHandler};
pub use ingredient::{AccessLevel, Category, Ingredient};
pub use pantry::Pantry;
pub use recipe::{OnFailure, Recipe, Step};
