use alphaclue_core::{Error, Result, Storage};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Progress storage kept in a single JSON object on disk
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStorage {
    /// Default data directory
    pub fn default_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("alphaclue")
    }

    /// Open (or start) the store at `path`. An unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable progress file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, items }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json =
            serde_json::to_string_pretty(&self.items).map_err(|e| Error::Storage(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| Error::Storage(e.to_string()))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove_item(&mut self, key: &str) {
        if self.items.remove(key).is_some() {
            if let Err(e) = self.flush() {
                log::warn!("failed to persist removal of {}: {}", key, e);
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("alphaclue-storage-{}-{}", name, std::process::id()))
            .join("progress.json")
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_path("reopen");
        let mut storage = FileStorage::open(&path);
        storage.set_item("lastPlayedDate", "2024-08-01").unwrap();
        storage.set_item("gameState-2024-08-01", "{}").unwrap();
        storage.remove_item("gameState-2024-08-01");

        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.get_item("lastPlayedDate").as_deref(), Some("2024-08-01"));
        assert_eq!(reopened.keys(), vec!["lastPlayedDate".to_string()]);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();
        assert!(FileStorage::open(&path).keys().is_empty());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
