//! Word content - categories and the secret words drawn from them

mod builtin;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Category and secret word handed out for one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretPair {
    pub category: String,
    pub word: String,
}

/// Supplies a secret pair for each round
pub trait WordSource: Send {
    fn next(&self, rng: &mut dyn RngCore) -> SecretPair;
}

/// Errors while loading word content
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Word table has no categories")]
    Empty,

    #[error("Category '{0}' has no words")]
    EmptyCategory(String),

    #[error("Failed to read word file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse word file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// On-disk layout of a word file
#[derive(Debug, Deserialize)]
struct ContentFile {
    categories: BTreeMap<String, Vec<String>>,
}

/// A named list of words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub words: Vec<String>,
}

/// Category table; draws a category uniformly, then a word uniformly within it
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    /// Build a table, rejecting empty tables and empty categories
    pub fn new(categories: Vec<Category>) -> Result<Self, ContentError> {
        if categories.is_empty() {
            return Err(ContentError::Empty);
        }
        if let Some(empty) = categories.iter().find(|c| c.words.is_empty()) {
            return Err(ContentError::EmptyCategory(empty.name.clone()));
        }
        Ok(Self { categories })
    }

    /// The table shipped with the server
    pub fn builtin() -> Self {
        Self {
            categories: builtin::CATEGORIES
                .iter()
                .map(|(name, words)| Category {
                    name: name.to_string(),
                    words: words.iter().map(|w| w.to_string()).collect(),
                })
                .collect(),
        }
    }

    /// Load a table from a `.json` or `.toml` file
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let content = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed: ContentFile = if is_json {
            serde_json::from_str(&content).map_err(|e| ContentError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            toml::from_str(&content).map_err(|e| ContentError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        Self::new(
            parsed
                .categories
                .into_iter()
                .map(|(name, words)| Category { name, words })
                .collect(),
        )
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}

impl WordSource for CategoryTable {
    fn next(&self, rng: &mut dyn RngCore) -> SecretPair {
        // Both lists are non-empty by construction
        let category = &self.categories[rng.gen_range(0..self.categories.len())];
        let word = &category.words[rng.gen_range(0..category.words.len())];
        SecretPair {
            category: category.name.clone(),
            word: word.clone(),
        }
    }
}
