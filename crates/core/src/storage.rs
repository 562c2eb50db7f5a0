use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const DEFAULT_CART_KEY: &str = "cart";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o failure at `{path}`: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("storage backend failure: {0}")]
    Backend(String),
    #[error("storage is unavailable for writes")]
    WriteRejected,
}

/// Durable string key-value storage holding the serialized cart.
///
/// Calls are synchronous and run to completion; the cart manager never issues
/// a second call before the first returns.
pub trait CartStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: CartStorage + ?Sized> CartStorage for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

/// Process-local storage. Counts successful writes so callers can observe
/// whether an operation persisted.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    writes: usize,
    reject_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut storage = Self::default();
        storage.entries.insert(key.into(), value.into());
        storage
    }

    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set_reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.reject_writes {
            return Err(StorageError::WriteRejected);
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CartStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)
            .map_err(|source| StorageError::Io { path: self.dir.clone(), source })?;

        let path = self.path_for(key);
        let staging = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&staging, value)
            .map_err(|source| StorageError::Io { path: staging.clone(), source })?;
        fs::rename(&staging, &path).map_err(|source| StorageError::Io { path, source })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::{CartStorage, FileStorage, MemoryStorage, StorageError};

    #[test]
    fn memory_storage_counts_only_successful_writes() {
        let mut storage = MemoryStorage::new();
        storage.write("cart", "[]").expect("first write");
        storage.set_reject_writes(true);

        let error = storage.write("cart", "[1]").expect_err("write should be rejected");

        assert!(matches!(error, StorageError::WriteRejected));
        assert_eq!(storage.write_count(), 1);
        assert_eq!(storage.get("cart"), Some("[]"));
    }

    #[test]
    fn file_storage_reads_absent_key_as_none() -> Result<(), String> {
        let dir = TempDir::new().map_err(|err| err.to_string())?;
        let storage = FileStorage::new(dir.path().join("nested"));

        let value = storage.read("cart").map_err(|err| err.to_string())?;
        assert!(value.is_none());
        Ok(())
    }

    #[test]
    fn file_storage_creates_directory_and_overwrites() -> Result<(), String> {
        let dir = TempDir::new().map_err(|err| err.to_string())?;
        let mut storage = FileStorage::new(dir.path().join("state"));

        storage.write("cart", "[]").map_err(|err| err.to_string())?;
        storage.write("cart", r#"[{"id":1}]"#).map_err(|err| err.to_string())?;

        let value = storage.read("cart").map_err(|err| err.to_string())?;
        assert_eq!(value.as_deref(), Some(r#"[{"id":1}]"#));
        assert!(storage.dir().join("cart.json").exists());
        Ok(())
    }

    #[test]
    fn boxed_storage_delegates() {
        let mut storage: Box<dyn CartStorage> = Box::new(MemoryStorage::new());
        storage.write("cart", "[]").expect("write through box");

        assert_eq!(storage.read("cart").expect("read through box").as_deref(), Some("[]"));
    }
}
