//! In-Memory Store Module
//!
//! HashMap-backed store with lazy TTL expiration. Used by the `memory`
//! backend and as the store behind the test suites.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use super::{KeyValueStore, StoreEntry, EMPTY_PAYLOAD};
use crate::error::Result;

// == Memory Store ==
/// In-process key-value store with per-entry TTL.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoreEntry>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of live entries.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|entry| !entry.is_expired()).count()
    }

    // == Is Empty ==
    /// Returns true if the store holds no live entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remaining TTL of a live entry, in seconds.
    pub async fn ttl(&self, key: &str) -> Option<u64> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(StoreEntry::ttl_remaining)
    }

    /// Reads a live entry, dropping it if it has expired.
    async fn live_entry(&self, key: &str) -> Option<String> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired() => return Some(entry.payload.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(StoreEntry::is_expired) {
            entries.remove(key);
        }
        None
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set_with_expire(
        &self,
        key: &str,
        payload: Option<&str>,
        ttl_seconds: u64,
    ) -> Result<()> {
        let entry = StoreEntry::new(payload.unwrap_or(EMPTY_PAYLOAD).to_string(), ttl_seconds);
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.live_entry(key).await.is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.live_entry(key).await)
    }

    async fn del(&self, key: &str) -> Result<bool> {
        let removed = self.entries.write().await.remove(key);
        Ok(removed.is_some_and(|entry| !entry.is_expired()))
    }

    async fn flush_all(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        info!("Memory store flushed {} entries", count);
        Ok(())
    }

    async fn info(&self) -> Result<String> {
        let keys = self.len().await;
        Ok(format!(
            "# Server\r\nbackend:memory\r\n# Keyspace\r\ndb0:keys={}\r\n",
            keys
        ))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
