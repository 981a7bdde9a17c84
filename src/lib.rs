//! Cache Driver - namespaced caching over interchangeable backends
//!
//! Provides an in-process driver with lazy TTL expiry and a Redis driver
//! behind one capability trait, plus readiness probing and a small admin API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod health;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{build_driver, CacheDriver, InMemoryCacheDriver, MemoryStore, RedisCacheDriver};
pub use config::Config;
pub use error::{CacheError, Result};
pub use health::{DependencyAggregator, ReadinessProbe};
pub use tasks::spawn_sweep_task;
