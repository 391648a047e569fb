//! Cache Statistics Module
//!
//! Tracks lookup outcomes and writes issued by the coordinator.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Stats Recorder ==
/// Lock-free counters shared by every clone of a cache handle.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    hits: AtomicU64,
    null_hits: AtomicU64,
    misses: AtomicU64,
    unavailable: AtomicU64,
    computes: AtomicU64,
    puts: AtomicU64,
    write_failures: AtomicU64,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// A hit on an entry that decodes to null.
    pub fn record_null_hit(&self) {
        self.null_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// A read that degraded because the store failed.
    pub fn record_unavailable(&self) {
        self.unavailable.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_compute(&self) {
        self.computes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Copies the current counter values.
    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            null_hits: self.null_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            unavailable: self.unavailable.load(Ordering::Relaxed),
            computes: self.computes.load(Ordering::Relaxed),
            puts: self.puts.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
        }
    }
}

// == Cache Stats ==
/// Point-in-time view of the cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the store with a value
    pub hits: u64,
    /// Lookups answered from the store with a cached null
    pub null_hits: u64,
    /// Lookups that found no entry
    pub misses: u64,
    /// Lookups that failed at the store
    pub unavailable: u64,
    /// Compute function invocations
    pub computes: u64,
    /// Writes issued
    pub puts: u64,
    /// Writes the store rejected
    pub write_failures: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns (hits + null hits) / all answered lookups, or 0.0 if no
    /// lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let found = self.hits + self.null_hits;
        let total = found + self.misses;
        if total == 0 {
            0.0
        } else {
            found as f64 / total as f64
        }
    }
}
