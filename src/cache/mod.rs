//! Cache Module
//!
//! Cache-aside coordination over a remote key-value store: namespaced keys,
//! TTL defaulting and the miss-then-populate flow.

mod coordinator;
mod inflight;
mod key;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use coordinator::{Cache, Lookup};
pub use inflight::InFlight;
pub use key::{CacheKey, KEY_SEPARATOR};
pub use stats::{CacheStats, StatsRecorder};
