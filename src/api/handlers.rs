//! API Handlers
//!
//! HTTP request handlers for each admin endpoint.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::cache::CacheDriver;
use crate::error::{CacheError, Result};
use crate::health::{DependencyAggregator, ReadinessProbe};
use crate::models::{AliveResponse, DeleteResponse, ReadyResponse, SetRequest, SetResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Driver selected at startup
    pub cache: Arc<dyn CacheDriver>,
    /// Dependencies reported by /health/ready
    pub readiness: Arc<DependencyAggregator>,
}

impl AppState {
    /// Creates state whose readiness check covers the cache driver only.
    pub fn new(cache: Arc<dyn CacheDriver>) -> Self {
        let probe: Arc<dyn ReadinessProbe> = Arc::new(cache.clone());
        Self::with_dependencies(cache, vec![probe])
    }

    /// Creates state with an explicit dependency list for readiness.
    pub fn with_dependencies(
        cache: Arc<dyn CacheDriver>,
        dependencies: Vec<Arc<dyn ReadinessProbe>>,
    ) -> Self {
        Self {
            cache,
            readiness: Arc::new(DependencyAggregator::new(dependencies)),
        }
    }
}

/// Handler for GET /keys
pub async fn list_keys_handler(State(state): State<AppState>) -> Json<Vec<String>> {
    let mut keys: Vec<String> = state.cache.keys().await.into_iter().collect();
    keys.sort();
    Json(keys)
}

/// Handler for GET /keys/:key
///
/// Answers `{ "<key>": value }` with a null value on a miss.
pub async fn get_key_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<HashMap<String, Option<String>>> {
    let value = state
        .cache
        .get(&key)
        .await
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned());

    Json(HashMap::from([(key, value)]))
}

/// Handler for PUT /keys
pub async fn set_key_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidInput(error_msg));
    }

    state.cache.set(&req.key, req.value.as_bytes(), req.ttl).await;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for DELETE /keys/all
pub async fn flush_namespace_handler(State(state): State<AppState>) -> Json<DeleteResponse> {
    state.cache.flush_namespace().await;
    Json(DeleteResponse::namespace())
}

/// Handler for DELETE /keys/prefix/:prefix
pub async fn delete_prefix_handler(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
) -> Json<DeleteResponse> {
    state.cache.delete_prefix(&prefix).await;
    Json(DeleteResponse::prefix(&prefix))
}

/// Handler for DELETE /keys/:key
pub async fn delete_key_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    state.cache.delete(&key).await;
    Json(DeleteResponse::key(&key))
}

/// Handler for GET /health/alive
pub async fn alive_handler() -> Json<AliveResponse> {
    Json(AliveResponse::alive())
}

/// Handler for GET /health/ready
///
/// 200 when every dependency is ready, 400 otherwise.
pub async fn ready_handler(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let report = state.readiness.check().await;
    let status = if report.ready {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    (status, Json(ReadyResponse::from(report)))
}
