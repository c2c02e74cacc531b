//! API Module
//!
//! Admin HTTP surface for observing and resetting the operator cache.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Cache statistics
//! - `DELETE /cache` - Invalidate everything
//! - `DELETE /cache/keys/:key` - Invalidate one key
//! - `POST /cache/preload` - Trigger a preload

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
