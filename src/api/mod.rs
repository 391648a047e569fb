//! API Module
//!
//! Admin HTTP surface over the cache.
//!
//! # Endpoints
//! - `GET|PUT|DELETE /cache/:namespace/:id` - Read, store or remove an entry
//! - `POST /flush` - Remove every entry
//! - `GET /info` - Store diagnostics
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
