use anyhow::{anyhow, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// String key/value persistence with browser local-storage semantics:
/// reads never fail, writes are synchronous.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// A single JSON object file mapping keys to string values.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        if !self.path.exists() {
            debug!("Local storage miss: {} does not exist", self.path.display());
            return BTreeMap::new();
        }

        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    warn!(
                        "Local storage file {} is malformed: {}. Treating it as empty.",
                        self.path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(e) => {
                warn!("Failed to read local storage {}: {}", self.path.display(), e);
                BTreeMap::new()
            }
        }
    }

    fn write_all(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(map)
            .map_err(|e| anyhow!("Failed to serialize local storage: {}", e))?;
        std::fs::write(&self.path, json).map_err(|e| {
            warn!("Failed to write local storage {}: {}", self.path.display(), e);
            anyhow!("Failed to write local storage: {}", e)
        })
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        let mut map = self.read_all();
        map.insert(key.to_string(), value);
        self.write_all(&map)?;
        debug!(key, "Local storage key written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut map = self.read_all();
        if map.remove(key).is_some() {
            self.write_all(&map)?;
            debug!(key, "Local storage key removed");
        }
        Ok(())
    }
}

/// In-process store, used by tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: impl Into<String>) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value.into());
        Self { values }
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_set_get_remove() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path().join("data").join("local_storage.json"));

        assert_eq!(storage.get("userLists"), None);
        storage.set("userLists", "{}".to_string()).unwrap();
        storage.set("theme", "dark".to_string()).unwrap();

        let reopened = FileStorage::new(storage.path().to_path_buf());
        assert_eq!(reopened.get("userLists").as_deref(), Some("{}"));

        storage.remove("userLists").unwrap();
        assert_eq!(storage.get("userLists"), None);
        assert_eq!(storage.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_file_storage_malformed_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local_storage.json");
        std::fs::write(&path, "not json at all").unwrap();

        let mut storage = FileStorage::new(path);
        assert_eq!(storage.get("userLists"), None);

        // A write replaces the malformed file
        storage.set("userLists", "[]".to_string()).unwrap();
        assert_eq!(storage.get("userLists").as_deref(), Some("[]"));
    }
}
