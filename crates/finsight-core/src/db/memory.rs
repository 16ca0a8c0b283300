//! In-process blob store

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Error, Result};

use super::BlobStore;

/// Blob store held entirely in memory
///
/// Nothing survives the process. Used by tests and by `finsight shell --ephemeral`.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with a raw value (e.g. a corrupt blob in tests)
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.write() {
            values.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| Error::InvalidData("Failed to acquire blob store lock".into()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| Error::InvalidData("Failed to acquire blob store lock".into()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| Error::InvalidData("Failed to acquire blob store lock".into()))?;
        values.remove(key);
        Ok(())
    }
}
