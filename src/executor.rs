//! Step execution: parameter resolution, handler invocation, outcome
//! capture.
//!
//! The executor never raises on behalf of a failing ingredient. Handler
//! errors, unknown ingredients, and unresolved context references all
//! come back as failed `StepResult`s; the orchestrator alone decides
//! whether a failure aborts the run.

use crate::context::ExecutionContext;
use crate::error::{GalleyError, Result};
use crate::handlers::HandlerRegistry;
use crate::recipe::Step;
use serde_json::{Map, Value};

/// Outcome of executing one step, always returned as data.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub step_name: String,
    pub success: bool,
    pub message: String,
    pub output: Value,
    pub error: Option<String>,
}

impl StepResult {
    fn ok(step: &Step, message: String, output: Value) -> Self {
        Self {
            step_name: step.name.clone(),
            success: true,
            message,
            output,
            error: None,
        }
    }

    fn failed(step: &Step, message: String) -> Self {
        Self {
            step_name: step.name.clone(),
            success: false,
            message: message.clone(),
            output: Value::Null,
            error: Some(message),
        }
    }
}

/// Resolve one parameter value against the context.
///
/// The substitution grammar is deliberately minimal: a string whose
/// entire content is `{{ path }}` (inner whitespace trimmed) is replaced
/// by the context value at `path`. Anything else — including strings
/// that merely contain the delimiters — is passed through as a literal.
/// No partial interpolation, no expressions.
pub fn resolve_value(value: &Value, ctx: &ExecutionContext) -> Result<Value> {
    let Value::String(s) = value else {
        return Ok(value.clone());
    };
    let Some(path) = template_path(s) else {
        return Ok(value.clone());
    };
    ctx.get(path)
        .cloned()
        .ok_or_else(|| GalleyError::ContextResolution(path.to_string()))
}

/// Extract the reference path if `s` is entirely a `{{ path }}` form.
fn template_path(s: &str) -> Option<&str> {
    let inner = s.strip_prefix("{{")?.strip_suffix("}}")?;
    let path = inner.trim();
    (!path.is_empty() && !path.contains("{{")).then_some(path)
}

/// Execute `step` against the current context.
pub fn execute_step(
    step: &Step,
    ctx: &ExecutionContext,
    handlers: &HandlerRegistry,
) -> StepResult {
    tracing::info!(step = %step.name, ingredient = %step.ingredient, "executing step");

    let Some(handler) = handlers.get(&step.ingredient) else {
        let msg = format!(
            "ingredient '{}' not found, cannot execute step '{}'",
            step.ingredient, step.name
        );
        tracing::error!("{msg}");
        return StepResult::failed(step, msg);
    };

    // Resolve context references before filtering so a bad reference is
    // reported even when the handler would have ignored that parameter.
    let mut resolved = Map::new();
    for (key, value) in &step.params {
        match resolve_value(value, ctx) {
            Ok(v) => {
                resolved.insert(key.clone(), v);
            }
            Err(e) => {
                let msg = format!("step '{}': {e}", step.name);
                tracing::error!("{msg}");
                return StepResult::failed(step, msg);
            }
        }
    }

    // Pass only the parameters the handler declares.
    let declared = handler.params();
    let accepted: Map<String, Value> = resolved
        .into_iter()
        .filter(|(k, _)| declared.contains(&k.as_str()))
        .collect();

    match handler.call(&accepted) {
        Ok(output) => {
            let msg = format!("step '{}' executed successfully", step.name);
            tracing::debug!(step = %step.name, "step succeeded");
            StepResult::ok(step, msg, output)
        }
        Err(e) => {
            let msg = format!("error during execution of step '{}': {e}", step.name);
            tracing::error!("{msg}");
            StepResult::failed(step, msg)
        }
    }
}
