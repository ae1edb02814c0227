//! Best-score persistence port.
//!
//! The engine receives a [`ScoreStore`] at construction and only ever reads
//! it once at startup and writes it after an improved completion. Storage is
//! a flat key-value map; the best score lives under [`BEST_SCORE_KEY`].

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::errors::StoreError;

/// Fixed storage key of the best score.
pub const BEST_SCORE_KEY: &str = "bestScore";

pub trait ScoreStore: Send {
    /// Stored best score, `None` when no game was ever completed.
    fn load_best_score(&self) -> Result<Option<u32>, StoreError>;

    fn save_best_score(&mut self, score: u32) -> Result<(), StoreError>;
}

/// In-memory store. Clones share the same map, so a test can keep a handle
/// after moving the store into an engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<String, u32>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best_score(score: u32) -> Self {
        let store = Self::default();
        if let Ok(mut guard) = store.values.write() {
            guard.insert(BEST_SCORE_KEY.to_string(), score);
        }
        store
    }

    pub fn best_score(&self) -> Option<u32> {
        self.values
            .read()
            .ok()
            .and_then(|guard| guard.get(BEST_SCORE_KEY).copied())
    }
}

impl ScoreStore for MemoryStore {
    fn load_best_score(&self) -> Result<Option<u32>, StoreError> {
        let guard = self
            .values
            .read()
            .map_err(|_| StoreError::StoragePoisoned)?;
        Ok(guard.get(BEST_SCORE_KEY).copied())
    }

    fn save_best_score(&mut self, score: u32) -> Result<(), StoreError> {
        let mut guard = self
            .values
            .write()
            .map_err(|_| StoreError::StoragePoisoned)?;
        guard.insert(BEST_SCORE_KEY.to_string(), score);
        Ok(())
    }
}

/// JSON object on disk, e.g. `{"bestScore": 6}`. Unknown keys are preserved.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the best score, leaving other keys untouched.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        let mut map = self.read_map()?;
        if map.remove(BEST_SCORE_KEY).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }

    fn read_map(&self) -> Result<Map<String, Value>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&text)? {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::Unavailable(format!(
                "expected a JSON object in {}, found {}",
                self.path.display(),
                other
            ))),
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl ScoreStore for FileStore {
    fn load_best_score(&self) -> Result<Option<u32>, StoreError> {
        let map = self.read_map()?;
        match map.get(BEST_SCORE_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| {
                    StoreError::Unavailable(format!("'{}' is not a move count: {}", BEST_SCORE_KEY, v))
                }),
        }
    }

    fn save_best_score(&mut self, score: u32) -> Result<(), StoreError> {
        let mut map = self.read_map()?;
        map.insert(BEST_SCORE_KEY.to_string(), Value::from(score));
        self.write_map(&map)
    }
}
