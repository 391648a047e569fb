//! Request DTOs for the admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::KEY_SEPARATOR;

/// Request body for PUT /cache/:namespace/:id
///
/// # Fields
/// - `value`: Any JSON value; `null` is cached as an explicit null
/// - `ttl`: Optional TTL in seconds (uses default if not specified)
#[derive(Debug, Clone, Deserialize)]
pub struct PutRequest {
    /// The value to store
    #[serde(default)]
    pub value: serde_json::Value,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl PutRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.ttl == Some(0) {
            return Some("TTL must be at least 1 second".to_string());
        }
        None
    }
}

/// Validates the namespace and id path segments.
pub fn validate_key_parts(namespace: &str, id: &str) -> Option<String> {
    if namespace.is_empty() || id.is_empty() {
        return Some("Namespace and id cannot be empty".to_string());
    }
    if namespace.contains(KEY_SEPARATOR) {
        return Some(format!("Namespace cannot contain '{}'", KEY_SEPARATOR));
    }
    None
}
