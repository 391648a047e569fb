//! API Handlers
//!
//! HTTP request handlers for each admin endpoint.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{Cache, CacheKey, Lookup};
use crate::codec::Value;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key_parts, DeleteResponse, FlushResponse, GetResponse, HealthResponse, PutRequest,
    PutResponse, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Shared cache handle
    pub cache: Cache,
}

impl AppState {
    /// Creates a new AppState around the given cache.
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }
}

fn check_key(namespace: &str, id: &str) -> Result<()> {
    match validate_key_parts(namespace, id) {
        Some(msg) => Err(CacheError::InvalidRequest(msg)),
        None => Ok(()),
    }
}

/// Handler for GET /cache/:namespace/:id
///
/// A miss is a 404; a cached null or an unreachable store is a null value.
pub async fn get_handler(
    State(state): State<AppState>,
    Path((namespace, id)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    check_key(&namespace, &id)?;

    match state.cache.get(&namespace, &id).await? {
        Lookup::Miss => Err(CacheError::NotFound(CacheKey::new(namespace, id).composite())),
        lookup => {
            let value = lookup.into_value().unwrap_or_default();
            Ok(Json(GetResponse::new(namespace, id, value)))
        }
    }
}

/// Handler for PUT /cache/:namespace/:id
///
/// Stores the body's value with an optional TTL.
pub async fn put_handler(
    State(state): State<AppState>,
    Path((namespace, id)): Path<(String, String)>,
    Json(req): Json<PutRequest>,
) -> Result<Json<PutResponse>> {
    check_key(&namespace, &id)?;
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl.unwrap_or_else(|| state.cache.default_ttl());
    let value = state
        .cache
        .put(&namespace, &id, Value::from(req.value), req.ttl)
        .await;

    Ok(Json(PutResponse::new(
        CacheKey::new(namespace, id).composite(),
        value,
        ttl,
    )))
}

/// Handler for DELETE /cache/:namespace/:id
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((namespace, id)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>> {
    check_key(&namespace, &id)?;

    let deleted = state.cache.del(&namespace, &id).await?;
    Ok(Json(DeleteResponse::new(
        CacheKey::new(namespace, id).composite(),
        deleted,
    )))
}

/// Handler for POST /flush
///
/// Removes every entry in every namespace.
pub async fn flush_handler(State(state): State<AppState>) -> Result<Json<FlushResponse>> {
    state.cache.flush_all().await?;
    Ok(Json(FlushResponse::flushed()))
}

/// Handler for GET /info
///
/// Returns the store's diagnostic text verbatim.
pub async fn info_handler(State(state): State<AppState>) -> Result<String> {
    state.cache.info().await
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(
        state.cache.stats(),
        state.cache.default_ttl(),
    ))
}

/// Handler for GET /health
///
/// Pings the store; the server itself is always up if this answers.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_ok = state.cache.store().ping().await.is_ok();
    Json(HealthResponse::from_ping(store_ok))
}
