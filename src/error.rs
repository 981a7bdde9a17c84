//! Error types for the cache drivers
//!
//! Provides unified error handling using thiserror.
//!
//! Cache operations themselves never return these to callers: transport
//! failures are logged inside the drivers and degrade to a miss or a dropped
//! write. They surface only at construction time, for malformed input, and
//! through the admin HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache drivers.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backend could not be reached while connecting
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Transport or protocol failure reported by the remote store
    #[error("Transport error: {0}")]
    Transport(#[from] redis::RedisError),

    /// A remote command exceeded its time budget
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Structured payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Caller supplied an argument the contract cannot honor
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be turned into a driver
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidInput(_) | CacheError::Serialization(_) => StatusCode::BAD_REQUEST,
            CacheError::Connection(_) | CacheError::Transport(_) | CacheError::Timeout(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            CacheError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache drivers.
pub type Result<T> = std::result::Result<T, CacheError>;
