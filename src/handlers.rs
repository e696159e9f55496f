//! The collaborator seam: one callable per ingredient id.
//!
//! Handlers are held in an explicit registration table populated at
//! startup through the builder; there is no reflection or dynamic module
//! loading. Each handler declares the parameter names it accepts so the
//! executor can filter a step's resolved parameters down to that set.
//!
//! The engine is agnostic to what a handler does behind this interface:
//! file I/O, network calls, or pure computation all look the same.

use anyhow::{Result, bail};
use serde_json::{Map, Value, json};
use std::collections::HashMap;

/// A single executable ingredient.
pub trait IngredientHandler: Send + Sync {
    /// Parameter names this handler accepts. The executor drops any
    /// resolved parameter not named here before calling.
    fn params(&self) -> &[&str];

    /// Invoke the handler. Errors are caught at the executor boundary
    /// and become failed step results; they never abort the process.
    fn call(&self, params: &Map<String, Value>) -> Result<Value>;
}

/// Explicit id -> handler table.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Box<dyn IngredientHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table: small arithmetic, string, and console
    /// handlers that exercise the seam and serve the test recipes.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("math.add", MathAdd);
        registry.register("math.multiply", MathMultiply);
        registry.register("string.concat", StringConcat);
        registry.register("string.upper", StringUpper);
        registry.register("console.print", ConsolePrint);
        registry
    }

    pub fn register(&mut self, id: &str, handler: impl IngredientHandler + 'static) {
        self.handlers.insert(id.to_string(), Box::new(handler));
    }

    pub fn get(&self, id: &str) -> Option<&dyn IngredientHandler> {
        self.handlers.get(id).map(|h| h.as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.handlers.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

fn number_param(params: &Map<String, Value>, name: &str) -> Result<f64> {
    match params.get(name) {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| anyhow::anyhow!("parameter '{name}' is not a finite number")),
        Some(other) => bail!("parameter '{name}' must be a number, got {other}"),
        None => bail!("missing required parameter '{name}'"),
    }
}

fn string_param<'a>(params: &'a Map<String, Value>, name: &str) -> Result<&'a str> {
    match params.get(name) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => bail!("parameter '{name}' must be a string, got {other}"),
        None => bail!("missing required parameter '{name}'"),
    }
}

fn number_value(n: f64) -> Value {
    // Keep integer results integral so context references compare cleanly
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        json!(n as i64)
    } else {
        json!(n)
    }
}

struct MathAdd;

impl IngredientHandler for MathAdd {
    fn params(&self) -> &[&str] {
        &["a", "b"]
    }

    fn call(&self, params: &Map<String, Value>) -> Result<Value> {
        Ok(number_value(
            number_param(params, "a")? + number_param(params, "b")?,
        ))
    }
}

struct MathMultiply;

impl IngredientHandler for MathMultiply {
    fn params(&self) -> &[&str] {
        &["a", "b"]
    }

    fn call(&self, params: &Map<String, Value>) -> Result<Value> {
        Ok(number_value(
            number_param(params, "a")? * number_param(params, "b")?,
        ))
    }
}

struct StringConcat;

impl IngredientHandler for StringConcat {
    fn params(&self) -> &[&str] {
        &["left", "right", "separator"]
    }

    fn call(&self, params: &Map<String, Value>) -> Result<Value> {
        let sep = params
            .get("separator")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        Ok(json!(format!(
            "{}{sep}{}",
            string_param(params, "left")?,
            string_param(params, "right")?
        )))
    }
}

struct StringUpper;

impl IngredientHandler for StringUpper {
    fn params(&self) -> &[&str] {
        &["value"]
    }

    fn call(&self, params: &Map<String, Value>) -> Result<Value> {
        Ok(json!(string_param(params, "value")?.to_uppercase()))
    }
}

struct ConsolePrint;

impl IngredientHandler for ConsolePrint {
    fn params(&self) -> &[&str] {
        &["message"]
    }

    fn call(&self, params: &Map<String, Value>) -> Result<Value> {
        let message = string_param(params, "message")?;
        println!("{message}");
        Ok(json!(message))
    }
}
