//! In-memory implementation of the KvStore trait.
//!
//! Primarily for testing. Same semantics as the SQLite backend but keeps
//! everything in a map with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{KvError, Result};
use crate::traits::KvStore;

/// In-memory key-value store.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Default)]
pub struct MemoryKv {
    inner: RwLock<HashMap<String, Bytes>>,
}

impl MemoryKv {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries.
    pub fn with_entries(entries: impl IntoIterator<Item = (String, Bytes)>) -> Self {
        Self {
            inner: RwLock::new(entries.into_iter().collect()),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let inner = self.inner.read().map_err(|_| KvError::Poisoned)?;
        Ok(inner.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<()> {
        let mut inner = self.inner.write().map_err(|_| KvError::Poisoned)?;
        inner.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut inner = self.inner.write().map_err(|_| KvError::Poisoned)?;
        inner.remove(key);
        Ok(())
    }
}
