//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::str::FromStr;

use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

use crate::error::{CacheError, Result};

/// Environment marker that triggers a full flush at initialization.
pub const DEVELOPMENT_ENV: &str = "dev";

/// Default TTL in seconds applied to puts without an explicit TTL.
pub const DEFAULT_TTL: u64 = 3600;

/// Which store the binary talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Redis,
    Memory,
}

impl FromStr for Backend {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Backend::Redis),
            "memory" => Ok(Backend::Memory),
            other => Err(CacheError::Config(format!("unknown cache backend '{}'", other))),
        }
    }
}

/// Connection parameters for the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    /// Sent as AUTH before any command when set
    pub password: Option<String>,
    /// Database index selected after connecting
    pub database: i64,
}

impl StoreConfig {
    /// Connection parameters for the redis client.
    ///
    /// The password is passed through verbatim, never embedded in a URL.
    pub fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: RedisConnectionInfo {
                db: self.database,
                username: None,
                password: self.password.clone(),
            },
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
            database: 0,
        }
    }
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote store connection
    pub store: StoreConfig,
    /// Default TTL in seconds for puts without explicit TTL
    pub ttl: u64,
    /// Deployment environment; `dev` flushes the store at startup
    pub env: Option<String>,
    /// Store backend used by the binary
    pub backend: Backend,
    /// Collapse concurrent misses on the same key into one compute
    pub dedupe_inflight: bool,
    /// Admin HTTP server port
    pub server_port: u16,
    /// Memory backend sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_HOST` - Store host (default: 127.0.0.1)
    /// - `REDIS_PORT` - Store port (default: 6379)
    /// - `REDIS_PASSWORD` - Optional password
    /// - `REDIS_DATABASE` - Database index (default: 0)
    /// - `CACHE_TTL` - Default TTL in seconds (default: 3600)
    /// - `APP_ENV` - Environment name, `dev` flushes on startup
    /// - `CACHE_BACKEND` - `redis` or `memory` (default: redis)
    /// - `CACHE_DEDUPE_INFLIGHT` - `true` to de-duplicate concurrent misses
    /// - `SERVER_PORT` - Admin HTTP port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Memory sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            store: StoreConfig {
                host: env::var("REDIS_HOST")
                    .ok()
                    .filter(|v| !v.is_empty())
                    .unwrap_or(defaults.store.host),
                port: parse_var("REDIS_PORT").unwrap_or(defaults.store.port),
                password: env::var("REDIS_PASSWORD").ok().filter(|v| !v.is_empty()),
                database: parse_var("REDIS_DATABASE").unwrap_or(defaults.store.database),
            },
            ttl: parse_var::<u64>("CACHE_TTL")
                .filter(|ttl| *ttl > 0)
                .unwrap_or(defaults.ttl),
            env: env::var("APP_ENV").ok().filter(|v| !v.is_empty()),
            backend: env::var("CACHE_BACKEND")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.backend),
            dedupe_inflight: parse_var("CACHE_DEDUPE_INFLIGHT").unwrap_or(false),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var::<u64>("CLEANUP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.cleanup_interval),
        }
    }

    /// Returns true when the environment asks for a flush at startup.
    pub fn is_development(&self) -> bool {
        self.env.as_deref() == Some(DEVELOPMENT_ENV)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            ttl: DEFAULT_TTL,
            env: None,
            backend: Backend::Redis,
            dedupe_inflight: false,
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}
