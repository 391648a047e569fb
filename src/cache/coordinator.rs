//! Cache Coordinator Module
//!
//! Namespaced get/put/delete/flush over a [`KeyValueStore`], plus the
//! fetch-or-compute flow.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn, Instrument};

use super::inflight::{wait_for_leader, Claim, InFlight, LeaderGuard};
use super::{CacheKey, CacheStats, StatsRecorder};
use crate::codec::{self, Value};
use crate::config::{Config, DEFAULT_TTL};
use crate::error::{CacheError, Result};
use crate::store::{KeyValueStore, EMPTY_PAYLOAD};

// == Lookup ==
/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// No entry at the key
    Miss,
    /// An entry was found; a cached null decodes to `Value::Null`
    Hit(Value),
    /// The store failed; treated as "no value" and never recomputed
    Unavailable,
}

impl Lookup {
    pub fn is_miss(&self) -> bool {
        matches!(self, Lookup::Miss)
    }

    /// The value a caller sees: `None` on a miss, null when unavailable.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Lookup::Miss => None,
            Lookup::Hit(value) => Some(value),
            Lookup::Unavailable => Some(Value::Null),
        }
    }
}

// == Cache ==
/// Handle to the cache. Cheap to clone; clones share the store connection.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn KeyValueStore>,
    default_ttl: u64,
    stats: Arc<StatsRecorder>,
    inflight: Option<Arc<InFlight>>,
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("default_ttl", &self.default_ttl)
            .field("dedupe_inflight", &self.inflight.is_some())
            .finish()
    }
}

impl Cache {
    // == Constructors ==
    /// Creates a cache over `store`. A zero TTL falls back to one hour.
    pub fn new(store: Arc<dyn KeyValueStore>, default_ttl: u64) -> Self {
        Self {
            store,
            default_ttl: if default_ttl == 0 { DEFAULT_TTL } else { default_ttl },
            stats: Arc::new(StatsRecorder::new()),
            inflight: None,
        }
    }

    /// Enables de-duplication of concurrent misses on the same key.
    pub fn with_inflight_dedupe(mut self) -> Self {
        self.inflight = Some(Arc::new(InFlight::new()));
        self
    }

    // == Init ==
    /// One-time setup from configuration.
    ///
    /// In the development environment every entry is flushed. A failing
    /// flush is logged and does not prevent startup.
    pub async fn init(store: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        let mut cache = Self::new(store, config.ttl);
        if config.dedupe_inflight {
            cache = cache.with_inflight_dedupe();
        }

        info!(
            "Cache initialized: default_ttl={}s, dedupe_inflight={}",
            cache.default_ttl, config.dedupe_inflight
        );

        if config.is_development() {
            if let Err(e) = cache.flush_all().await {
                error!("Startup flush failed: {}", e);
            }
        }
        cache
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    /// The underlying store, for operations the cache does not wrap.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    // == Put ==
    /// Stores `value` under `namespace/id` and echoes it back.
    ///
    /// A missing or zero TTL uses the default. Store failures are logged,
    /// never returned.
    #[instrument(level = "debug", skip_all, fields(namespace = %namespace, id = %id))]
    pub async fn put(
        &self,
        namespace: &str,
        id: impl fmt::Display,
        value: Value,
        ttl_seconds: Option<u64>,
    ) -> Value {
        let key = CacheKey::new(namespace, id).composite();
        self.write(&key, &value, ttl_seconds).await;
        value
    }

    async fn write(&self, key: &str, value: &Value, ttl_seconds: Option<u64>) {
        let ttl = ttl_seconds.filter(|t| *t > 0).unwrap_or(self.default_ttl);
        self.stats.record_put();

        let payload = match codec::encode(value) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Cannot encode value for {}: {}", key, e);
                self.stats.record_write_failure();
                return;
            }
        };

        if let Err(e) = self
            .store
            .set_with_expire(key, payload.as_deref(), ttl)
            .await
        {
            warn!("Cache write for {} failed: {}", key, e);
            self.stats.record_write_failure();
        }
    }

    // == Get ==
    /// Reads `namespace/id`.
    ///
    /// Existence is checked before the read; an entry that expires between
    /// the two reads as a cached null. Store failures degrade to
    /// [`Lookup::Unavailable`]. Only a malformed payload is an error.
    #[instrument(level = "debug", skip_all, fields(namespace = %namespace, id = %id))]
    pub async fn get(&self, namespace: &str, id: impl fmt::Display) -> Result<Lookup> {
        let key = CacheKey::new(namespace, id).composite();
        self.lookup(&key).await
    }

    async fn lookup(&self, key: &str) -> Result<Lookup> {
        match self.store.exists(key).await {
            Ok(true) => {}
            Ok(false) => {
                debug!("Cache miss for {}", key);
                self.stats.record_miss();
                return Ok(Lookup::Miss);
            }
            Err(e) => return Ok(self.unavailable(key, e)),
        }

        let payload = match self.store.get(key).await {
            Ok(payload) => payload,
            Err(e) => return Ok(self.unavailable(key, e)),
        };

        let value = match payload.as_deref() {
            None | Some(EMPTY_PAYLOAD) => Value::Null,
            Some(text) => codec::decode_at(key, text)?,
        };

        if value.is_null() {
            self.stats.record_null_hit();
        } else {
            self.stats.record_hit();
        }
        debug!("Cache hit for {}", key);
        Ok(Lookup::Hit(value))
    }

    fn unavailable(&self, key: &str, err: CacheError) -> Lookup {
        warn!("Cache read for {} degraded to no value: {}", key, err);
        self.stats.record_unavailable();
        Lookup::Unavailable
    }

    // == Fetch ==
    /// Returns the cached value, or computes, stores and returns it on a miss.
    ///
    /// On a miss `compute` receives the id; its result is returned at once
    /// and written in the background with the default TTL. A cached null is
    /// a hit. A store failure yields null without computing. A failing
    /// compute is returned as [`CacheError::Compute`] and nothing is cached.
    #[instrument(level = "debug", skip_all, fields(namespace = %namespace, id = %id))]
    pub async fn fetch<I, F, Fut>(&self, namespace: &str, id: I, compute: F) -> Result<Value>
    where
        I: fmt::Display,
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = anyhow::Result<Value>>,
    {
        let key = CacheKey::new(namespace, id);
        let composite = key.composite();

        match self.lookup(&composite).await? {
            Lookup::Hit(value) => Ok(value),
            Lookup::Unavailable => Ok(Value::Null),
            Lookup::Miss => self.populate(key, composite, compute).await,
        }
    }

    /// Former name of [`Cache::fetch`].
    #[deprecated(note = "use `fetch`")]
    pub async fn get_put<I, F, Fut>(&self, namespace: &str, id: I, compute: F) -> Result<Value>
    where
        I: fmt::Display,
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = anyhow::Result<Value>>,
    {
        self.fetch(namespace, id, compute).await
    }

    async fn populate<F, Fut>(&self, key: CacheKey, composite: String, compute: F) -> Result<Value>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = anyhow::Result<Value>>,
    {
        let guard = match self.inflight.as_ref().map(|table| table.claim(&composite)) {
            Some(Claim::Follower(rx)) => {
                if let Some(value) = wait_for_leader(rx).await {
                    debug!("Joined in-flight compute for {}", composite);
                    return Ok(value);
                }
                None
            }
            Some(Claim::Leader(guard)) => Some(guard),
            None => None,
        };

        self.stats.record_compute();
        let value = compute(key.id)
            .await
            .map_err(|source| CacheError::Compute {
                key: composite.clone(),
                source,
            })?;

        if let Some(guard) = &guard {
            guard.publish(&value);
        }
        self.spawn_write(composite, value.clone(), guard);
        Ok(value)
    }

    /// Writes in the background under the caller's span. The in-flight
    /// guard, if any, is released once the write has completed.
    fn spawn_write(&self, key: String, value: Value, guard: Option<LeaderGuard>) {
        let cache = self.clone();
        tokio::spawn(
            async move {
                cache.write(&key, &value, None).await;
                drop(guard);
            }
            .in_current_span(),
        );
    }

    // == Delete ==
    /// Removes `namespace/id`. Returns whether an entry was removed.
    #[instrument(level = "debug", skip_all, fields(namespace = %namespace, id = %id))]
    pub async fn del(&self, namespace: &str, id: impl fmt::Display) -> Result<bool> {
        let key = CacheKey::new(namespace, id).composite();
        self.store.del(&key).await
    }

    // == Flush ==
    /// Removes every entry in every namespace.
    pub async fn flush_all(&self) -> Result<()> {
        info!("Cache flush");
        self.store.flush_all().await
    }

    /// Diagnostic text from the store.
    pub async fn info(&self) -> Result<String> {
        self.store.info().await
    }
}
