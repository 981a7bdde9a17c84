//! API Module
//!
//! HTTP admin surface over the configured cache driver.
//!
//! # Endpoints
//! - `GET /keys` - List keys in this namespace
//! - `GET /keys/:key` - Read one key
//! - `PUT /keys` - Store a key-value pair
//! - `DELETE /keys/all` - Flush the namespace
//! - `DELETE /keys/prefix/:prefix` - Delete keys by prefix
//! - `DELETE /keys/:key` - Delete one key
//! - `GET /health/alive` - Liveness
//! - `GET /health/ready` - Dependency readiness

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
