//! Cache Aside - a namespaced cache facade over Redis
//!
//! Get/put/fetch-or-compute/delete/flush with per-key TTL, explicit null
//! caching and date-time recovery from JSON payloads.

pub mod api;
pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, CacheKey, Lookup};
pub use codec::Value;
pub use config::Config;
pub use error::{CacheError, Result};
pub use store::{KeyValueStore, MemoryStore, RedisStore};
pub use tasks::spawn_cleanup_task;
