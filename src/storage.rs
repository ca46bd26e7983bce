//! Local persistence of cart snapshots.
//!
//! Storage is a flat string-keyed map of JSON documents, the way a browser's
//! local storage is. Reads and writes are synchronous.

use std::io;

use mockall::automock;
use thiserror::Error;

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key cannot be mapped onto the backend, e.g. it is empty.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Underlying I/O failure.
    #[error("storage i/o error")]
    Io(#[from] io::Error),

    /// The backend's lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A string-keyed document store.
#[automock]
pub trait CartStorage: Send + Sync {
    /// Read the document at `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` at `key`, replacing any previous document.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the document at `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
