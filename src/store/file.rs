//! A store persisted as a single JSON object on disk.
//!
//! The whole map is held in memory and rewritten on every mutation. Writes go
//! to a sibling temp file first and are renamed over the real file, so a
//! crash mid-write leaves the previous contents intact.

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::Mutex;

use super::{KvStore, StoreError};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty when the file does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => HashMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), records = entries.len(), "opened store");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        // Sorted output keeps the file diffable.
        let sorted: BTreeMap<&String, &String> = entries.iter().collect();
        let encoded = serde_json::to_string_pretty(&sorted)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, encoded).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Apply `change` to a copy of the map, persist it, then commit it.
    async fn mutate<F>(&self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut HashMap<String, String>) -> bool,
    {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        if !change(&mut next) {
            return Ok(());
        }
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }
}

impl KvStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value);
            true
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.mutate(|entries| entries.remove(key).is_some()).await
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.lock().await.keys().cloned().collect())
    }
}
