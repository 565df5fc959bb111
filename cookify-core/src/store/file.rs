//! Disk-backed key-value store: one JSON file per key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

use super::KeyValueStore;

/// Disk-backed key-value store.
///
/// File names are the SHA-256 of the key, so any key is filesystem-safe. The
/// key itself is stored inside the record so `keys()` can list it.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

/// On-disk record for one key.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredValue {
    key: String,
    value: String,
    written_at: DateTime<Utc>,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Get the default data directory: ~/.cookify
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".cookify"))
            .unwrap_or_else(|| PathBuf::from("data/cookify"))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir.join(format!("{}.json", hex::encode(&digest[..16])))
    }

    fn read_record(path: &Path) -> Option<StoredValue> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let record = Self::read_record(&self.path_for(key))?;
        // Hash collision or a hand-edited file
        (record.key == key).then_some(record.value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let record = StoredValue {
            key: key.to_string(),
            value: value.to_string(),
            written_at: Utc::now(),
        };
        fs::write(self.path_for(key), serde_json::to_string_pretty(&record)?)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut keys: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|p| Self::read_record(&p))
            .map(|r| r.key)
            .collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip_and_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("kv"));

        assert_eq!(store.get("missing"), None);
        assert!(store.keys().is_empty());

        store.set("ingredient_bell pepper", "[1]").unwrap();
        store.set("meal_detail_52772", "{}").unwrap();

        assert_eq!(store.get("ingredient_bell pepper").as_deref(), Some("[1]"));
        assert_eq!(
            store.keys(),
            vec!["ingredient_bell pepper".to_string(), "meal_detail_52772".to_string()]
        );

        store.delete("meal_detail_52772").unwrap();
        store.delete("never_written").unwrap();
        assert_eq!(store.keys(), vec!["ingredient_bell pepper".to_string()]);
    }

    #[test]
    fn test_garbage_file_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().to_path_buf());
        store.set("k", "v").unwrap();

        fs::write(store.path_for("k"), "not json").unwrap();
        assert_eq!(store.get("k"), None);
        assert!(store.keys().is_empty());
    }
}
