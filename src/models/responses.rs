//! Response DTOs for the cache admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::health::{DependencyStatus, ReadinessReport};

/// Response body for PUT /keys
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set", key),
            key,
        }
    }
}

/// Response body for the DELETE endpoints
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// What was removed
    pub message: String,
}

impl DeleteResponse {
    pub fn key(key: &str) -> Self {
        Self {
            message: format!("Key '{}' deleted", key),
        }
    }

    pub fn prefix(prefix: &str) -> Self {
        Self {
            message: format!("Keys with prefix '{}' deleted", prefix),
        }
    }

    pub fn namespace() -> Self {
        Self {
            message: "All keys in namespace deleted".to_string(),
        }
    }
}

/// Response body for GET /health/alive
#[derive(Debug, Clone, Serialize)]
pub struct AliveResponse {
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl AliveResponse {
    pub fn alive() -> Self {
        Self {
            status: "alive".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Overall readiness label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadyStatus {
    Ok,
    NotOk,
}

/// Response body for GET /health/ready
#[derive(Debug, Clone, Serialize)]
pub struct ReadyResponse {
    pub status: ReadyStatus,
    pub dependencies: Vec<DependencyStatus>,
}

impl From<ReadinessReport> for ReadyResponse {
    fn from(report: ReadinessReport) -> Self {
        Self {
            status: if report.ready {
                ReadyStatus::Ok
            } else {
                ReadyStatus::NotOk
            },
            dependencies: report.dependencies,
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
