//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::codec::Value;

/// Response body for GET /cache/:namespace/:id
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub namespace: String,
    pub id: String,
    /// The cached value; date-times are rendered as RFC 3339 strings
    pub value: Value,
}

impl GetResponse {
    pub fn new(namespace: impl Into<String>, id: impl Into<String>, value: Value) -> Self {
        Self {
            namespace: namespace.into(),
            id: id.into(),
            value,
        }
    }
}

/// Response body for PUT /cache/:namespace/:id
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    /// Success message
    pub message: String,
    /// The composite key written
    pub key: String,
    /// The value as handed to the cache
    pub value: Value,
    /// TTL applied, in seconds
    pub ttl: u64,
}

impl PutResponse {
    pub fn new(key: impl Into<String>, value: Value, ttl: u64) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' stored", key),
            key,
            value,
            ttl,
        }
    }
}

/// Response body for DELETE /cache/:namespace/:id
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub key: String,
    /// False when nothing was stored at the key
    pub deleted: bool,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>, deleted: bool) -> Self {
        let key = key.into();
        let message = if deleted {
            format!("Key '{}' deleted", key)
        } else {
            format!("Key '{}' was not cached", key)
        };
        Self {
            message,
            key,
            deleted,
        }
    }
}

/// Response body for POST /flush
#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    pub message: String,
}

impl FlushResponse {
    pub fn flushed() -> Self {
        Self {
            message: "All cache entries flushed".to_string(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate ((hits + null hits) / answered lookups)
    pub hit_rate: f64,
    /// Default TTL in seconds
    pub default_ttl: u64,
}

impl StatsResponse {
    pub fn new(stats: CacheStats, default_ttl: u64) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
            default_ttl,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    /// Whether the store answered a ping
    pub store: bool,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn from_ping(store_ok: bool) -> Self {
        Self {
            status: if store_ok { "healthy" } else { "degraded" }.to_string(),
            store: store_ok,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
