//! API Routes
//!
//! Configures the Axum router with all admin endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    alive_handler, delete_key_handler, delete_prefix_handler, flush_namespace_handler,
    get_key_handler, list_keys_handler, ready_handler, set_key_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// `/keys/all` is a static route and wins over `/keys/:key`.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/keys", get(list_keys_handler).put(set_key_handler))
        .route("/keys/all", delete(flush_namespace_handler))
        .route("/keys/prefix/:prefix", delete(delete_prefix_handler))
        .route("/keys/:key", get(get_key_handler).delete(delete_key_handler))
        .route("/health/alive", get(alive_handler))
        .route("/health/ready", get(ready_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
