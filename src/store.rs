use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::StorageError;
use crate::types::workout::{Workout, WorkoutRecord};

/// Key-value persistence provider, the equivalent of the browser's local storage.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage. Clones share the same entries, so a second controller
/// built from a clone sees what the first one saved.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One JSON file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        // Write then rename so a reader never sees a half-written payload.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Maps the in-memory workout sequence to a single JSON array under one key.
pub struct WorkoutStore<S> {
    storage: S,
    key: String,
}

impl<S: Storage> WorkoutStore<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Replaces whatever was stored before with the full sequence.
    pub fn save(&self, workouts: &[Workout]) -> Result<(), StorageError> {
        let records: Vec<WorkoutRecord> = workouts.iter().map(WorkoutRecord::from).collect();
        let payload = serde_json::to_string(&records)?;
        self.storage.set(&self.key, &payload)?;
        tracing::debug!("Saved {} workouts under '{}'", records.len(), self.key);
        Ok(())
    }

    /// Never fails: missing or corrupt data reads as an empty history, and
    /// individual records that cannot be restored are skipped.
    pub fn load(&self) -> Vec<Workout> {
        let payload = match self.storage.get(&self.key) {
            Ok(Some(payload)) => payload,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!("Failed to read stored workouts: {}", err);
                return Vec::new();
            }
        };

        let entries: Vec<serde_json::Value> = match serde_json::from_str(&payload) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!("Ignoring corrupt workout data under '{}': {}", self.key, err);
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let record: WorkoutRecord = match serde_json::from_value(entry) {
                    Ok(record) => record,
                    Err(err) => {
                        tracing::warn!("Skipping malformed stored workout #{}: {}", index, err);
                        return None;
                    }
                };
                match Workout::restore(&record) {
                    Ok(workout) => Some(workout),
                    Err(err) => {
                        tracing::warn!("Skipping stored workout {}: {}", record.id, err);
                        None
                    }
                }
            })
            .collect()
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.key)
    }
}
