//! The orchestrator: recipe in, run record out.
//!
//! A run parses the recipe, builds a fresh context, and walks the steps
//! strictly in order. Step failures are policy decisions, not errors:
//! `abort` halts the run, `continue` records the failure and moves on.
//! Only infrastructure faults (an unreadable recipe file, a broken
//! pantry store) surface as `Err`.

use crate::config::GalleyConfig;
use crate::context::{self, ExecutionContext};
use crate::executor::{self, StepResult};
use crate::handlers::HandlerRegistry;
use crate::output;
use crate::pantry::Pantry;
use crate::recipe::{OnFailure, Recipe};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Terminal (and in-flight) status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Pending,
    Running,
    /// A step with the abort policy failed; later steps never ran.
    Aborted,
    /// Every step succeeded.
    Completed,
    /// At least one continue-policy step failed, the rest ran.
    CompletedWithFailures,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Pending => "pending",
            RunStatus::Running => "running",
            RunStatus::Aborted => "aborted",
            RunStatus::Completed => "completed",
            RunStatus::CompletedWithFailures => "completed_with_failures",
        }
    }
}

/// Everything recorded about one execution of a recipe.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub recipe_name: String,
    pub status: RunStatus,
    pub step_results: Vec<StepResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunRecord {
    fn new(recipe_name: &str) -> Self {
        Self {
            recipe_name: recipe_name.to_string(),
            status: RunStatus::Pending,
            step_results: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn succeeded(&self) -> usize {
        self.step_results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.step_results.len() - self.succeeded()
    }
}

/// Orchestrates recipe runs against a pantry and a handler table.
pub struct KitchenEngine {
    pantry: Pantry,
    handlers: HandlerRegistry,
    prune_context: bool,
    history: Vec<RunRecord>,
}

impl KitchenEngine {
    pub fn new(pantry: Pantry, handlers: HandlerRegistry, config: &GalleyConfig) -> Self {
        Self {
            pantry,
            handlers,
            prune_context: config.engine.prune_context,
            history: Vec::new(),
        }
    }

    pub fn pantry(&self) -> &Pantry {
        &self.pantry
    }

    pub fn pantry_mut(&mut self) -> &mut Pantry {
        &mut self.pantry
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Past runs of this engine instance, oldest first.
    pub fn history(&self) -> &[RunRecord] {
        &self.history
    }

    /// Build the registry before running: discover descriptors under
    /// `paths`, register what validates, and report overall compliance.
    /// Returns the number of descriptors processed.
    pub fn build_registry(&mut self, paths: &[PathBuf]) -> crate::error::Result<usize> {
        if paths.is_empty() {
            return Ok(0);
        }
        let results = self.pantry.discover_and_register(paths)?;
        let summary = self.pantry.validation_summary();
        tracing::info!(
            discovered = results.len(),
            valid = summary.valid_ingredients,
            registered = summary.total_ingredients,
            "registry built"
        );
        Ok(results.len())
    }

    /// Parse and run the recipe at `path`.
    pub fn run_file(&mut self, path: &Path) -> crate::error::Result<RunRecord> {
        let recipe = Recipe::from_path(path)?;
        Ok(self.run(&recipe))
    }

    /// Run a parsed recipe to completion.
    pub fn run(&mut self, recipe: &Recipe) -> RunRecord {
        let mut record = RunRecord::new(&recipe.name);
        record.status = RunStatus::Running;
        tracing::info!(recipe = %recipe.name, steps = recipe.steps.len(), "run started");
        output::action(&format!(
            "Running {} ({} step{})",
            recipe.name,
            recipe.steps.len(),
            if recipe.steps.len() == 1 { "" } else { "s" }
        ));

        let mut ctx = context::build_context(recipe, &self.handlers);

        for (i, step) in recipe.steps.iter().enumerate() {
            output::sub_action(&format!("({}/{}) {}", i + 1, recipe.steps.len(), step.name));
            let result = executor::execute_step(step, &ctx, &self.handlers);
            ctx.record_step(&step.name, result.output.clone(), result.success);

            let failed = !result.success;
            if failed {
                output::warning(&result.message);
            }
            record.step_results.push(result);

            if failed && step.on_failure == OnFailure::Abort {
                tracing::warn!(recipe = %recipe.name, step = %step.name, "run aborted");
                record.status = RunStatus::Aborted;
                record.finished_at = Some(Utc::now());
                self.finish(&record, &ctx);
                return self.push_record(record);
            }

            if self.prune_context {
                self.prune(&mut ctx);
            }
        }

        record.status = if record.step_results.iter().all(|r| r.success) {
            RunStatus::Completed
        } else {
            RunStatus::CompletedWithFailures
        };
        record.finished_at = Some(Utc::now());
        self.finish(&record, &ctx);
        self.push_record(record)
    }

    /// Keep only the namespaces later steps can still reference.
    fn prune(&self, ctx: &mut ExecutionContext) {
        let keep = ctx.keys_with_prefixes(&["data.", "steps."]);
        ctx.prune(&keep);
    }

    fn finish(&self, record: &RunRecord, ctx: &ExecutionContext) {
        tracing::info!(
            recipe = %record.recipe_name,
            status = record.status.as_str(),
            succeeded = record.succeeded(),
            failed = record.failed(),
            context_keys = ctx.len(),
            "run finished"
        );
        match record.status {
            RunStatus::Completed => {
                output::success(&format!("{}: all steps completed", record.recipe_name));
            }
            RunStatus::CompletedWithFailures => output::warning(&format!(
                "{}: completed with {} failed step(s)",
                record.recipe_name,
                record.failed()
            )),
            RunStatus::Aborted => {
                output::error(&format!("{}: aborted", record.recipe_name));
            }
            RunStatus::Pending | RunStatus::Running => {}
        }
    }

    fn push_record(&mut self, record: RunRecord) -> RunRecord {
        self.history.push(record.clone());
        record
    }
}
