//! Store Module
//!
//! The operation set the cache needs from a TTL-capable key-value store,
//! with a Redis implementation and an in-process one.

mod entry;
mod memory;
mod redis_store;

pub use entry::StoreEntry;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use async_trait::async_trait;

use crate::error::Result;

/// What a payload-less write stores.
pub const EMPTY_PAYLOAD: &str = "";

/// Trait for key-value store backends
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Sets `key` unconditionally and expires it after `ttl_seconds`.
    ///
    /// `None` writes [`EMPTY_PAYLOAD`].
    async fn set_with_expire(&self, key: &str, payload: Option<&str>, ttl_seconds: u64)
        -> Result<()>;

    /// Checks whether a live entry exists at `key`.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Reads the payload at `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Removes `key`; returns whether anything was removed.
    async fn del(&self, key: &str) -> Result<bool>;

    /// Removes every key in the selected database.
    async fn flush_all(&self) -> Result<()>;

    /// Diagnostic text describing the store.
    async fn info(&self) -> Result<String>;

    /// Round-trip check against the store.
    async fn ping(&self) -> Result<()>;
}
