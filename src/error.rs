//! Error taxonomy for the galley engine.
//!
//! Only failures that stop something live here. Findings the caller is
//! expected to act on are returned as structured data instead: rule
//! violations as `ValidationResult`, dependency problems as `Conflict`,
//! access denials as a boolean decision, and step failures as a failed
//! `StepResult`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleyError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("recipe parse error in {path}: {reason}")]
    RecipeParse { path: String, reason: String },

    #[error("unresolved context reference: {0}")]
    ContextResolution(String),

    #[error("pantry store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GalleyError>;
