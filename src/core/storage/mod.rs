//! Named blob storage backing the dashboard's persisted state.

use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::RwLock;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key is not usable as a file name.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage result type.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A key-value store of opaque string blobs.
pub trait BlobStore: Send + Sync {
    /// Read a blob. `Ok(None)` if nothing is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns error if the blob exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a blob, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns error if the blob cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Filesystem-backed storage: one `<root>/<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Create a storage instance at a custom location.
    #[must_use]
    pub const fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl BlobStore for Storage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key)?;

        if !path.exists() {
            return Ok(None);
        }

        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, value)?;
        Ok(())
    }
}

/// In-process storage, discarded on drop.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.blobs.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> (Storage, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::with_root(nested_root(&dir));
        (storage, dir)
    }

    fn nested_root(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("nested").join("storage")
    }

    #[test]
    fn set_and_get() {
        let (storage, dir) = temp_storage();
        storage.set("focus", r#"[{"id":"f1"}]"#).unwrap();
        assert_eq!(
            storage.get("focus").unwrap().as_deref(),
            Some(r#"[{"id":"f1"}]"#)
        );
        assert!(nested_root(&dir).join("focus.json").exists());
    }

    #[test]
    fn get_missing_is_none() {
        let (storage, _dir) = temp_storage();
        assert!(storage.get("nonexistent").unwrap().is_none());
    }

    #[test]
    fn set_overwrites() {
        let (storage, _dir) = temp_storage();
        storage.set("focus", "[]").unwrap();
        storage.set("focus", r#"[{"id":"f2"}]"#).unwrap();
        assert_eq!(storage.get("focus").unwrap().as_deref(), Some(r#"[{"id":"f2"}]"#));
    }

    #[test]
    fn rejects_path_like_keys() {
        let (storage, _dir) = temp_storage();
        assert!(matches!(
            storage.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.get(""), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert!(storage.get("k").unwrap().is_none());
        storage.set("k", "v1").unwrap();
        storage.set("k", "v2").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v2"));
    }
}
