//! File-backed ingredient metadata store.
//!
//! Records live in a single `pantry.json` under the pantry root, loaded into
//! memory on open and rewritten atomically (temp file + rename) on every
//! mutation. An exclusive `fs2` lock on a sidecar file is held for the life
//! of the store, enforcing the single-writer discipline at the facade:
//! concurrent registration from a second process fails fast instead of
//! corrupting the index.

use crate::error::{GalleyError, Result};
use crate::ingredient::{Category, Ingredient};
use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const STORE_FILE: &str = "pantry.json";
const LOCK_FILE: &str = "pantry.lock";

#[derive(Debug)]
pub struct IngredientStore {
    root: PathBuf,
    ingredients: BTreeMap<String, Ingredient>,
    // Held until drop; releasing the flock lets the next writer in.
    _lock: StoreLock,
}

#[derive(Debug)]
struct StoreLock {
    file: File,
    path: PathBuf,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
    }
}

impl IngredientStore {
    /// Open (or create) the store under `root`.
    pub fn open(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root)?;

        let lock_path = root.join(LOCK_FILE);
        let lock_file = File::create(&lock_path)?;
        if lock_file.try_lock_exclusive().is_err() {
            return Err(GalleyError::Store(format!(
                "pantry at {} is locked by another process",
                root.display()
            )));
        }

        let store_path = root.join(STORE_FILE);
        let ingredients = if store_path.exists() {
            let content = std::fs::read_to_string(&store_path)?;
            serde_json::from_str(&content)
                .map_err(|e| GalleyError::Store(format!("corrupt index {}: {e}", store_path.display())))?
        } else {
            BTreeMap::new()
        };

        tracing::debug!(root = %root.display(), count = ingredients.len(), "pantry store opened");

        Ok(Self {
            root: root.to_path_buf(),
            ingredients,
            _lock: StoreLock {
                file: lock_file,
                path: lock_path,
            },
        })
    }

    /// Insert or overwrite a record and persist the index.
    pub fn insert(&mut self, mut ingredient: Ingredient) -> Result<()> {
        // Re-registration under the same id overwrites but keeps the
        // original creation timestamp.
        if let Some(existing) = self.ingredients.get(&ingredient.id) {
            ingredient.created = existing.created;
        }
        ingredient.updated = chrono::Utc::now();
        self.ingredients.insert(ingredient.id.clone(), ingredient);
        self.flush()
    }

    pub fn get(&self, id: &str) -> Option<&Ingredient> {
        self.ingredients.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ingredients.contains_key(id)
    }

    /// List records, optionally filtered by category, in id order.
    pub fn list(&self, category: Option<Category>) -> Vec<&Ingredient> {
        self.ingredients
            .values()
            .filter(|i| category.is_none_or(|c| i.category == c))
            .collect()
    }

    pub fn remove(&mut self, id: &str) -> Result<Option<Ingredient>> {
        let removed = self.ingredients.remove(id);
        if removed.is_some() {
            self.flush()?;
        }
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Rewrite the index atomically: write a temp file in the same
    /// directory, then rename over the old index.
    fn flush(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.ingredients)
            .map_err(|e| GalleyError::Store(e.to_string()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(self.root.join(STORE_FILE))
            .map_err(|e| GalleyError::Store(format!("failed to persist index: {e}")))?;
        Ok(())
    }
}
