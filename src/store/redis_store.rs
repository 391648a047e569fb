//! Redis Store Module
//!
//! Talks to a Redis server through a shared, auto-reconnecting connection.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client, RedisError};
use tracing::{debug, error, info, warn};

use super::{KeyValueStore, EMPTY_PAYLOAD};
use crate::config::StoreConfig;
use crate::error::{CacheError, Result};

// == Redis Store ==
/// Redis-backed store.
///
/// The connection manager is cheap to clone; every command runs on a clone
/// of the one shared connection.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    address: String,
}

impl RedisStore {
    // == Connect ==
    /// Connects to `host:port`, authenticates when a password is set and
    /// selects the configured database.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let address = format!("{}:{}", config.host, config.port);
        let client = Client::open(config.connection_info()).map_err(|e| {
            CacheError::Config(format!("invalid store address {}: {}", address, e))
        })?;

        let connection = ConnectionManager::new(client).await.map_err(|e| {
            error!("Redis connection to {} failed: {}", address, e);
            CacheError::Connection(e.to_string())
        })?;

        info!(
            "Redis store connected to {} (db {}, auth: {})",
            address,
            config.database,
            config.password.is_some()
        );

        Ok(Self {
            connection,
            address,
        })
    }

    /// Logs a failed command and converts it.
    ///
    /// Connection-level failures are reported and never abort the process;
    /// the manager reconnects on the next command.
    fn observe(&self, command: &str, err: RedisError) -> CacheError {
        let err = CacheError::from(err);
        if err.is_connection() {
            error!("Redis {} on {} failed: {}", command, self.address, err);
        } else {
            warn!("Redis {} on {} failed: {}", command, self.address, err);
        }
        err
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn set_with_expire(
        &self,
        key: &str,
        payload: Option<&str>,
        ttl_seconds: u64,
    ) -> Result<()> {
        let mut conn = self.connection.clone();
        redis::cmd("SET")
            .arg(key)
            .arg(payload.unwrap_or(EMPTY_PAYLOAD))
            .arg("EX")
            .arg(ttl_seconds.max(1))
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| self.observe("SET", e))?;

        debug!("Set {} with TTL {}s", key, ttl_seconds);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection.clone();
        redis::cmd("EXISTS")
            .arg(key)
            .query_async::<_, bool>(&mut conn)
            .await
            .map_err(|e| self.observe("EXISTS", e))
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection.clone();
        redis::cmd("GET")
            .arg(key)
            .query_async::<_, Option<String>>(&mut conn)
            .await
            .map_err(|e| self.observe("GET", e))
    }

    async fn del(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection.clone();
        let removed: i64 = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| self.observe("DEL", e))?;
        Ok(removed > 0)
    }

    async fn flush_all(&self) -> Result<()> {
        let mut conn = self.connection.clone();
        redis::cmd("FLUSHALL")
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| self.observe("FLUSHALL", e))
    }

    async fn info(&self) -> Result<String> {
        let mut conn = self.connection.clone();
        redis::cmd("INFO")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| self.observe("INFO", e))
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection.clone();
        let reply: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| self.observe("PING", e))?;
        if reply == "PONG" {
            Ok(())
        } else {
            Err(CacheError::Store(format!("unexpected PING reply: {}", reply)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn local_config() -> StoreConfig {
        StoreConfig {
            database: 15,
            ..StoreConfig::default()
        }
    }

    #[tokio::test]
    #[ignore] // Requires a Redis server on localhost:6379
    async fn test_basic_operations() {
        let store = RedisStore::connect(&local_config()).await.unwrap();
        store.ping().await.unwrap();

        store.set_with_expire("test/key", Some("value"), 60).await.unwrap();
        assert!(store.exists("test/key").await.unwrap());
        assert_eq!(store.get("test/key").await.unwrap().as_deref(), Some("value"));

        assert!(store.del("test/key").await.unwrap());
        assert!(!store.exists("test/key").await.unwrap());
        assert!(store.get("test/key").await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore] // Requires a Redis server on localhost:6379
    async fn test_ttl_expiration() {
        let store = RedisStore::connect(&local_config()).await.unwrap();

        store.set_with_expire("test/expiring", Some("value"), 1).await.unwrap();
        assert!(store.exists("test/expiring").await.unwrap());

        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(!store.exists("test/expiring").await.unwrap());
    }

    #[tokio::test]
    #[ignore] // Requires a Redis server on localhost:6379
    async fn test_info() {
        let store = RedisStore::connect(&local_config()).await.unwrap();
        let info = store.info().await.unwrap();
        assert!(info.contains("redis_version"));
    }
}
