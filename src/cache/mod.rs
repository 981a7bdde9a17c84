//! Cache Module
//!
//! Namespaced cache drivers behind a single capability trait: an in-process
//! map with lazy TTL expiry and a Redis-backed driver.

mod driver;
mod entry;
mod key;
mod memory;
mod redis;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;

use tracing::info;

use crate::config::{BackendKind, Config};
use crate::error::Result;

// Re-export public types
pub use self::driver::{effective_ttl, CacheDriver, StructuredValue};
pub use self::entry::CacheEntry;
pub use self::key::{escape_glob, Namespace, NAMESPACE_SEPARATOR};
pub use self::memory::{InMemoryCacheDriver, MemoryStore};
pub use self::redis::RedisCacheDriver;

// == Public Constants ==
/// TTL in seconds applied when a caller does not pass one
pub const DEFAULT_TTL_SECONDS: u64 = 600;

// == Driver Construction ==
/// Builds the driver selected by `config`.
///
/// The memory driver is created over `store`; the Redis driver connects
/// eagerly and fails fast when the server is unreachable.
pub async fn build_driver(config: &Config, store: MemoryStore) -> Result<Arc<dyn CacheDriver>> {
    match config.backend {
        BackendKind::Memory => {
            info!("Using in-memory cache driver, namespace={}", config.namespace);
            Ok(Arc::new(InMemoryCacheDriver::with_store(
                config.namespace.clone(),
                store,
            )))
        }
        BackendKind::Redis => {
            info!(
                "Using redis cache driver at {}:{}, namespace={}",
                config.redis.host, config.redis.port, config.namespace
            );
            let driver = RedisCacheDriver::connect(&config.redis, config.namespace.clone()).await?;
            Ok(Arc::new(driver))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RedisSettings;
    use crate::health::ReadinessProbe;
    use std::time::Duration;

    #[tokio::test]
    async fn test_build_memory_driver_uses_given_store() {
        let store = MemoryStore::new();
        let config = Config {
            namespace: "built".to_string(),
            ..Config::default()
        };

        let driver = build_driver(&config, store.clone()).await.unwrap();
        driver.set("k", b"v", None).await;

        assert_eq!(driver.name(), "InMemoryCacheDriver");
        assert_eq!(store.len().await, 1);
        assert!(store.contains_encoded("built:k").await);
    }

    #[tokio::test]
    async fn test_build_redis_driver_fails_fast() {
        let config = Config {
            backend: BackendKind::Redis,
            redis: RedisSettings {
                host: "127.0.0.1".to_string(),
                port: 1,
                connect_timeout: Duration::from_millis(500),
                command_timeout: Duration::from_millis(500),
                ..RedisSettings::default()
            },
            ..Config::default()
        };

        assert!(build_driver(&config, MemoryStore::new()).await.is_err());
    }

    #[test]
    fn test_effective_ttl_default() {
        assert_eq!(effective_ttl(None), DEFAULT_TTL_SECONDS);
        assert_eq!(effective_ttl(Some(5)), 5);
    }
}
