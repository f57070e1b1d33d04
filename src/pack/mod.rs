pub mod provider;

pub use provider::{BundledProvider, FileProvider, PackProvider, StaticProvider};

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use thiserror::Error;

/// A named, ordered collection of target words
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WordPack {
    pub id: u32,
    pub name: String,
    pub words: Vec<String>,
    /// Compare answers ignoring case on both sides instead of upper-casing the input
    #[serde(default)]
    pub case_insensitive: bool,
    /// Optional visual hint per word
    #[serde(default)]
    pub hints: HashMap<String, String>,
}

impl WordPack {
    pub fn new(id: u32, name: impl Into<String>, words: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            words,
            case_insensitive: false,
            hints: HashMap::new(),
        }
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    pub fn with_hints<I, K, V>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.hints = hints
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn has_hints(&self) -> bool {
        !self.hints.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }
}

#[derive(Debug, Error)]
pub enum PackError {
    #[error("unable to read word packs from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse word pack {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no word packs available from {0}")]
    Missing(String),
}

/// Drop packs the session cannot use: packs without words and packs
/// reusing an id seen earlier in the list. Order is preserved.
pub fn sanitize_packs(packs: Vec<WordPack>) -> Vec<WordPack> {
    let mut seen = HashSet::new();
    packs
        .into_iter()
        .filter(|pack| {
            if pack.words.is_empty() {
                tracing::warn!(id = pack.id, name = %pack.name, "skipping word pack without words");
                return false;
            }
            if !seen.insert(pack.id) {
                tracing::warn!(id = pack.id, name = %pack.name, "skipping word pack with duplicate id");
                return false;
            }
            true
        })
        .collect()
}
