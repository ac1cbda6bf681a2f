use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer as Snowball};

use crate::error::MeteorError;

/// Opaque identifier of one sense grouping (synonym set).
pub type SenseId = u32;

pub trait Stemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;
}

pub trait SynonymLexicon: Send + Sync {
    /// Sense groupings `word` belongs to; empty for unknown words.
    fn synonym_sets(&self, word: &str) -> HashSet<SenseId>;
}

/// English Snowball (Porter2) stemmer.
pub struct SnowballStemmer {
    inner: Snowball,
}

impl SnowballStemmer {
    pub fn english() -> Self {
        Self {
            inner: Snowball::create(Algorithm::English),
        }
    }
}

impl Default for SnowballStemmer {
    fn default() -> Self {
        Self::english()
    }
}

impl Stemmer for SnowballStemmer {
    fn stem(&self, word: &str) -> String {
        self.inner.stem(word).into_owned()
    }
}

/// Synonym lexicon backed by a list of sense groupings.
///
/// The text format has one grouping per line, words separated by whitespace.
/// Blank lines and lines starting with `#` are skipped. A word may appear in
/// several groupings.
#[derive(Debug, Default, Clone)]
pub struct SynonymTable {
    senses: HashMap<String, HashSet<SenseId>>,
    n_groups: u32,
}

impl SynonymTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, MeteorError> {
        let file = File::open(path).map_err(|e| MeteorError::io("opening synonym table", e))?;
        let table = Self::from_reader(BufReader::new(file))?;
        log::info!(
            "loaded {} synonym groups covering {} words from {}",
            table.n_groups,
            table.senses.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, MeteorError> {
        let mut table = Self::new();
        for line in reader.lines() {
            let line = line.map_err(|e| MeteorError::io("reading synonym table", e))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            table.add_group(line.split_whitespace());
        }
        Ok(table)
    }

    /// Registers a new sense grouping and returns its id.
    pub fn add_group<I, S>(&mut self, words: I) -> SenseId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = self.n_groups;
        self.n_groups += 1;
        for word in words {
            self.senses.entry(word.into()).or_default().insert(id);
        }
        id
    }

    pub fn n_groups(&self) -> u32 {
        self.n_groups
    }
}

impl SynonymLexicon for SynonymTable {
    fn synonym_sets(&self, word: &str) -> HashSet<SenseId> {
        self.senses.get(word).cloned().unwrap_or_default()
    }
}

/// Read-only lexical collaborators shared by every scoring call.
#[derive(Clone)]
pub struct LexicalResources {
    pub stemmer: Arc<dyn Stemmer>,
    pub synonyms: Arc<dyn SynonymLexicon>,
}

impl LexicalResources {
    pub fn new(stemmer: Arc<dyn Stemmer>, synonyms: Arc<dyn SynonymLexicon>) -> Self {
        Self { stemmer, synonyms }
    }

    pub fn with_synonyms(synonyms: SynonymTable) -> Self {
        Self::new(Arc::new(SnowballStemmer::english()), Arc::new(synonyms))
    }
}

impl Default for LexicalResources {
    fn default() -> Self {
        Self::with_synonyms(SynonymTable::new())
    }
}

static DEFAULT_RESOURCES: Lazy<Arc<LexicalResources>> =
    Lazy::new(|| Arc::new(LexicalResources::default()));

/// English stemmer with an empty synonym table, built once per process.
pub fn default_resources() -> Arc<LexicalResources> {
    Arc::clone(&DEFAULT_RESOURCES)
}
