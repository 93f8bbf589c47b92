//! A thesaurus held in memory.
//!
//! Loaded from a JSON file that maps each word to a payload in the same shape
//! the HTTP API returns:
//!
//! ```json
//! {
//!   "happy": { "adjective": { "syn": ["joyful", "content"] } },
//!   "dog":   { "noun": { "syn": ["domestic dog"] }, "verb": { "syn": ["chase"] } }
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::{LookupError, LookupFut, SynonymLookup, SynonymSet, wire};

#[derive(Debug, thiserror::Error)]
pub enum StaticThesaurusError {
    #[error("failed to read thesaurus file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse thesaurus file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: wire::WireError,
    },
    #[error("invalid entry for {word:?} in {path:?}: {source}")]
    Entry {
        path: PathBuf,
        word: String,
        source: wire::WireError,
    },
}

/// Word → synonyms map. Keys are stored lowercase.
#[derive(Debug, Clone, Default)]
pub struct StaticThesaurus {
    entries: HashMap<String, SynonymSet>,
}

impl StaticThesaurus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entry(mut self, word: &str, set: SynonymSet) -> Self {
        self.insert(word, set);
        self
    }

    pub fn insert(&mut self, word: &str, set: SynonymSet) {
        self.entries.insert(word.to_lowercase(), set);
    }

    pub fn load(path: &Path) -> Result<Self, StaticThesaurusError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| StaticThesaurusError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let root: Value =
            serde_json::from_str(&content).map_err(|e| StaticThesaurusError::Parse {
                path: path.to_path_buf(),
                source: e.into(),
            })?;
        let Value::Object(words) = root else {
            return Err(StaticThesaurusError::Parse {
                path: path.to_path_buf(),
                source: wire::WireError::NotAnObject,
            });
        };

        let mut thesaurus = Self::new();
        for (word, payload) in &words {
            let set = wire::normalize_entry(payload).map_err(|source| {
                StaticThesaurusError::Entry {
                    path: path.to_path_buf(),
                    word: word.clone(),
                    source,
                }
            })?;
            thesaurus.insert(word, set);
        }

        tracing::info!(path = %path.display(), words = thesaurus.len(), "Loaded static thesaurus");
        Ok(thesaurus)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SynonymLookup for StaticThesaurus {
    fn name(&self) -> &'static str {
        "static"
    }

    fn lookup<'a>(&'a self, word: &'a str) -> LookupFut<'a> {
        let result = self
            .entries
            .get(&word.to_lowercase())
            .cloned()
            .ok_or_else(|| LookupError::NotFound {
                word: word.to_string(),
            });
        Box::pin(async move { result })
    }
}
