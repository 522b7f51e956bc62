//! Key-value blob storage backing the cart.
//!
//! The cart only needs `read` and `write` on a single fixed key. Media:
//!
//! - [`MemoryBlobStore`] - in-process map; per-request session carts and tests
//! - [`FileBlobStore`] - one file per key under a directory; the CLI cart

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by a blob storage medium.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A string blob store addressed by key.
pub trait BlobStore {
    /// Read the blob stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing has been written under the key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the medium cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the medium cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory blob store.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, String>,
}

impl MemoryBlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `value` under `key`.
    #[must_use]
    pub fn with_blob(key: &str, value: impl Into<String>) -> Self {
        let mut blobs = HashMap::new();
        blobs.insert(key.to_string(), value.into());
        Self { blobs }
    }

    /// Take the blob stored under `key` out of the store.
    pub fn take(&mut self, key: &str) -> Option<String> {
        self.blobs.remove(key)
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed blob store: the blob for `key` lives in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the blobs.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl BlobStore for FileBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;

        // Write a sibling file, then rename it over the target.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| StorageError::Io { path, source })
    }
}
