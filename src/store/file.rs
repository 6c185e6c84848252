//! File-backed store
//!
//! One JSON object per learner, rewritten on every `set`. The file is read
//! once at open; a missing or corrupt file opens as an empty store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use super::KeyValueStore;

/// Persistent [`KeyValueStore`] backed by a single JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<HashMap<String, serde_json::Value>>,
}

impl JsonFileStore {
    /// Open the store at the default per-user data location
    pub fn open_default() -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from("", "", "brainbox").context("Failed to determine data directory")?;
        Ok(Self::open(proj_dirs.data_dir().join("learner.json")))
    }

    /// Open the store at an explicit path.
    ///
    /// Never fails: an unreadable or corrupt file opens as empty, with a
    /// warning in the log.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read_file(&path) {
            Ok(values) => values,
            Err(err) => {
                if path.exists() {
                    tracing::warn!("starting from empty state, could not load {path:?}: {err:#}");
                }
                HashMap::new()
            }
        };
        Self { path, values: Mutex::new(values) }
    }

    /// Path this store reads and writes
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(path: &Path) -> Result<HashMap<String, serde_json::Value>> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read store from {:?}", path))?;
        serde_json::from_str(&contents).with_context(|| "Failed to parse store file")
    }

    fn write_file(&self, values: &HashMap<String, serde_json::Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(values).with_context(|| "Failed to serialize store")?;

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write store to {:?}", self.path))?;

        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: serde_json::Value) {
        let Ok(mut values) = self.values.lock() else {
            return;
        };
        values.insert(key.to_string(), value);

        // Best-effort write: gameplay never waits on, or fails with, the disk.
        if let Err(err) = self.write_file(&values) {
            tracing::warn!("failed to persist {:?}: {err:#}", self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("learner.json");

        {
            let store = JsonFileStore::open(&path);
            store.set("streak", serde_json::json!({"count": 4}));
        }

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("streak"), Some(serde_json::json!({"count": 4})));
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("nope.json"));

        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("learner.json");
        std::fs::write(&path, "{ not valid json").unwrap();

        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn creates_parent_directories_on_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/learner.json");

        let store = JsonFileStore::open(&path);
        store.set("key", serde_json::json!(1));

        assert!(path.exists());
    }
}
