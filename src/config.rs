//! Configuration loading.
//!
//! Settings come from a `galley.toml` file; every field has a default so
//! a missing file means defaults with a warning, while a file that exists
//! but does not parse is a hard configuration error. The `GALLEY_PANTRY`
//! environment variable overrides the pantry root from either source.

use crate::error::{GalleyError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct GalleyConfig {
    pub pantry: PantryConfig,
    pub recipes: RecipesConfig,
    pub engine: EngineConfig,
    /// Default tracing filter, overridable by `RUST_LOG`.
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PantryConfig {
    /// Directory holding the pantry store and lock files.
    pub root: PathBuf,
    /// Directories scanned for ingredient descriptors.
    pub discovery_paths: Vec<PathBuf>,
}

impl Default for PantryConfig {
    fn default() -> Self {
        Self {
            root: default_data_dir().join("pantry"),
            discovery_paths: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecipesConfig {
    /// Directory searched when a recipe is named rather than given as a path.
    pub path: PathBuf,
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            path: default_data_dir().join("recipes"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Prune non-referencable context namespaces after each step.
    pub prune_context: bool,
}

/// XDG-style data directory, `~/.local/share/galley` by default.
fn default_data_dir() -> PathBuf {
    let data_home = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".local/share")
        });
    data_home.join("galley")
}

impl GalleyConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                GalleyError::Configuration(format!("cannot read {}: {e}", path.display()))
            })?;
            toml::from_str(&content).map_err(|e| {
                GalleyError::Configuration(format!("invalid config {}: {e}", path.display()))
            })?
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        if let Ok(root) = std::env::var("GALLEY_PANTRY") {
            config.pantry.root = PathBuf::from(root);
        }
        Ok(config)
    }

    /// Load from the default location (`galley.toml` in the working
    /// directory) unless an explicit path was given.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) if !path.exists() => Err(GalleyError::Configuration(format!(
                "config file not found: {}",
                path.display()
            ))),
            Some(path) => Self::load(path),
            None => Self::load(Path::new("galley.toml")),
        }
    }
}
