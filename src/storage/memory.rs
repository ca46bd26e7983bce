//! In-process storage.

use std::sync::Mutex;

use rustc_hash::FxHashMap;

use super::{CartStorage, StorageError};

/// Storage held in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: Mutex<FxHashMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a document exists at `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.documents
            .lock()
            .is_ok_and(|documents| documents.contains_key(key))
    }
}

impl CartStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let documents = self.documents.lock().map_err(|_poisoned| StorageError::Poisoned)?;

        Ok(documents.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut documents = self.documents.lock().map_err(|_poisoned| StorageError::Poisoned)?;

        documents.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut documents = self.documents.lock().map_err(|_poisoned| StorageError::Poisoned)?;

        documents.remove(key);

        Ok(())
    }
}
