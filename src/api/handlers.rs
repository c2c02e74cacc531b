//! API Handlers
//!
//! HTTP request handlers for the admin endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::config::Config;
use crate::directory::{OperatorDirectory, PreloadReport};
use crate::error::{CacheError, Result};
use crate::models::{HealthResponse, InvalidateResponse, StatsResponse};
use crate::source::OperatorSource;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<OperatorDirectory>,
}

impl AppState {
    /// Creates a new AppState around an existing directory.
    pub fn new(directory: Arc<OperatorDirectory>) -> Self {
        Self { directory }
    }

    /// Creates a directory over `source` from configuration.
    pub fn from_config(source: Arc<dyn OperatorSource>, config: &Config) -> Self {
        Self::new(Arc::new(OperatorDirectory::new(source, config.clone())))
    }
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.directory.cache().stats().into())
}

/// Handler for DELETE /cache
///
/// Administrative reset; drops every entry.
pub async fn invalidate_all_handler(State(state): State<AppState>) -> Json<InvalidateResponse> {
    let removed = state.directory.cache().invalidate_all();
    tracing::info!("Admin cache reset removed {} entries", removed);
    Json(InvalidateResponse::all(removed))
}

/// Handler for DELETE /cache/keys/:key
pub async fn invalidate_key_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<InvalidateResponse>> {
    if state.directory.cache().invalidate(&key) {
        Ok(Json(InvalidateResponse::key(&key)))
    } else {
        Err(CacheError::NotFound(format!("cache key {}", key)))
    }
}

/// Handler for POST /cache/preload
///
/// Runs a preload now and returns its report.
pub async fn preload_handler(State(state): State<AppState>) -> Json<PreloadReport> {
    Json(state.directory.preloader().run().await)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
