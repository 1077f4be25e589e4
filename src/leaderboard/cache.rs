//! Previous-Score Cache
//!
//! The only state that outlives the process: the last observed score per
//! player id, used to compute change deltas after a restart. It is
//! best-effort; the tracker treats any failure as "no previous scores".

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use serde_json::{Map, Value};
use thiserror::Error;

/// Key under which the score map is stored.
pub const PREV_SCORES_KEY: &str = "prevScores";

/// Player id -> last observed score.
pub type ScoreMap = BTreeMap<String, u32>;

/// Cache errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing the backing file failed.
    #[error("cache I/O error: {0}")]
    Io(#[from] io::Error),

    /// Backing document is not valid JSON of the expected shape.
    #[error("cache format error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pluggable persistence for the previous-score snapshot.
pub trait ScoreCache: Send {
    /// Load the stored map; an absent store loads as empty.
    fn load(&self) -> Result<ScoreMap, CacheError>;

    /// Replace the stored map.
    fn save(&mut self, scores: &ScoreMap) -> Result<(), CacheError>;
}

/// Cache held in process memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreCache {
    scores: ScoreMap,
}

impl MemoryScoreCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache pre-populated with scores.
    pub fn with_scores(scores: ScoreMap) -> Self {
        Self { scores }
    }
}

impl ScoreCache for MemoryScoreCache {
    fn load(&self) -> Result<ScoreMap, CacheError> {
        Ok(self.scores.clone())
    }

    fn save(&mut self, scores: &ScoreMap) -> Result<(), CacheError> {
        self.scores = scores.clone();
        Ok(())
    }
}

/// Cache stored in a JSON key-value document on disk.
///
/// The score map lives under [`PREV_SCORES_KEY`] as a flat
/// `{ "<id>": <score> }` object. Other keys in the document are kept.
#[derive(Debug, Clone)]
pub struct JsonFileScoreCache {
    path: PathBuf,
}

impl JsonFileScoreCache {
    /// Use the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_document(&self) -> Result<Map<String, Value>, CacheError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(Map::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl ScoreCache for JsonFileScoreCache {
    fn load(&self) -> Result<ScoreMap, CacheError> {
        let mut document = self.read_document()?;
        match document.remove(PREV_SCORES_KEY) {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(ScoreMap::new()),
        }
    }

    fn save(&mut self, scores: &ScoreMap) -> Result<(), CacheError> {
        let mut document = self.read_document()?;
        document.insert(PREV_SCORES_KEY.to_string(), serde_json::to_value(scores)?);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&document)?)?;
        Ok(())
    }
}
