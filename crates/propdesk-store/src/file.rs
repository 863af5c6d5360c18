//! File-backed [`KeyValueStore`]: the device-local persistent store.
//!
//! All entries live in one JSON object file:
//!
//! ```text
//! { "AUTH_TOKEN": "tok123", "USER_DATA": "{\"id\":\"1\",...}" }
//! ```
//!
//! Every write rewrites the whole file through a sibling temp file and a
//! rename, so a crash mid-write leaves either the old file or the new one,
//! never a truncated mix.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::{KeyValueStore, StoreError};

type Entries = BTreeMap<String, String>;

/// A store persisted as a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    /// Opens (lazily) the store at `path`. The file and its parent
    /// directory are created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Entries, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Entries::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn persist(&self, entries: &Entries) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec(entries)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        tracing::trace!(path = %self.path.display(), keys = entries.len(), "store persisted");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.json"));

        assert_eq!(store.get("AUTH_TOKEN").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/store.json");
        let store = FileStore::new(&path);

        store.set("k", "v").await.unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists(), "temp file should be renamed away");
    }

    #[tokio::test]
    async fn test_values_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        FileStore::new(&path).set("AUTH_TOKEN", "tok123").await.unwrap();
        let reopened = FileStore::new(&path);

        assert_eq!(
            reopened.get("AUTH_TOKEN").await.unwrap().as_deref(),
            Some("tok123")
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_reports_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"not json").unwrap();
        let store = FileStore::new(&path);

        let result = store.get("AUTH_TOKEN").await;

        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_clear_removes_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = FileStore::new(&path);
        store.set("k", "v").await.unwrap();

        store.clear().await.unwrap();
        store.clear().await.unwrap();

        assert!(!path.exists());
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
