//! In-memory storage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use super::{LocalStorage, StorageError, validate_key};

/// Keeps values in process memory.
///
/// Counts successful writes so tests can assert when persistence did or did
/// not happen.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    read_only: bool,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, e.g. to exercise a full disk.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    /// Seed a value without counting it as a write.
    #[must_use]
    pub fn with_item(self, key: &str, value: &str) -> Self {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Number of successful `set_item` calls so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        if self.read_only {
            return Err(StorageError::Unavailable("storage is read-only".to_string()));
        }
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        if self.read_only {
            return Err(StorageError::Unavailable("storage is read-only".to_string()));
        }
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
