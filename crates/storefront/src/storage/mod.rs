//! Local key-value storage.
//!
//! The storefront persists everything that must survive a restart (the cart
//! and the signed-in user) in a small string key-value store on the local
//! device. Values are opaque strings; callers own their encoding.
//!
//! # Backends
//!
//! - [`FileStorage`] - one file per key under a data directory
//! - [`MemoryStorage`] - process memory, for tests and ephemeral runs

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors returned by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key contains characters that cannot be used as a file name.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The backend refuses writes.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A synchronous string key-value store.
///
/// Implementations must be cheap enough to call on every cart mutation;
/// writes replace the whole value.
pub trait LocalStorage: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be modified.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Check that a key is non-empty and only uses `[A-Za-z0-9_-]`.
fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
