//! In-memory blob store
//!
//! Same contract as the SQLite store, without touching disk. Used by tests
//! and by hosts that bring their own storage.

use crate::BlobStore;
use spintoearn_core::{Error, Result};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> Result<usize> {
        let blobs = self.blobs.read().map_err(|_| poisoned())?;
        Ok(blobs.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn clear(&self) -> Result<()> {
        let mut blobs = self.blobs.write().map_err(|_| poisoned())?;
        blobs.clear();
        Ok(())
    }
}

fn poisoned() -> Error {
    Error::DatabaseError("memory store lock poisoned".to_string())
}

impl BlobStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let blobs = self.blobs.read().map_err(|_| poisoned())?;
        Ok(blobs.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut blobs = self.blobs.write().map_err(|_| poisoned())?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut blobs = self.blobs.write().map_err(|_| poisoned())?;
        blobs.remove(key);
        Ok(())
    }
}
