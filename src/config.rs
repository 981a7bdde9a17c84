//! Configuration Module
//!
//! Handles loading driver and server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Which backend the composition root should construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Process-local map with lazy TTL expiry
    Memory,
    /// Remote Redis server
    Redis,
}

impl FromStr for BackendKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in_memory" | "in-memory" => Ok(BackendKind::Memory),
            "redis" => Ok(BackendKind::Redis),
            other => Err(CacheError::InvalidConfig(format!(
                "unknown cache backend '{}', expected 'memory' or 'redis'",
                other
            ))),
        }
    }
}

/// Connection parameters for the Redis driver.
#[derive(Debug, Clone)]
pub struct RedisSettings {
    /// Full connection URL; takes precedence over host/port/password/db
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: i64,
    /// Upper bound for establishing a connection
    pub connect_timeout: Duration,
    /// Upper bound for any single command or pipeline round trip
    pub command_timeout: Duration,
}

impl RedisSettings {
    /// Returns the URL handed to the redis client.
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }

        match &self.password {
            Some(password) => format!(
                "redis://:{}@{}:{}/{}",
                password, self.host, self.port, self.db
            ),
            None => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 6379,
            password: None,
            db: 0,
            connect_timeout: Duration::from_millis(2000),
            command_timeout: Duration::from_millis(2000),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend constructed at startup
    pub backend: BackendKind,
    /// Namespace every key of this deployment is scoped under
    pub namespace: String,
    /// HTTP server port
    pub server_port: u16,
    /// Expired-entry sweep interval in seconds for the memory backend, 0 disables it
    pub sweep_interval: u64,
    /// Redis connection parameters
    pub redis: RedisSettings,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `memory` or `redis` (default: memory)
    /// - `CACHE_NAMESPACE` - Key namespace (default: cache)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Expired entry sweep in seconds, 0 = off (default: 0)
    /// - `REDIS_URL` - Full Redis URL, overrides the fields below
    /// - `REDIS_HOST` / `REDIS_PORT` / `REDIS_PASSWORD` / `REDIS_DB`
    /// - `REDIS_CONNECT_TIMEOUT_MS` / `REDIS_COMMAND_TIMEOUT_MS` (default: 2000)
    ///
    /// Numeric values that fail to parse fall back to their defaults; an
    /// unknown backend name is rejected.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let redis_defaults = defaults.redis.clone();

        let backend = match env::var("CACHE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.backend,
        };

        Ok(Self {
            backend,
            namespace: env::var("CACHE_NAMESPACE").unwrap_or(defaults.namespace),
            server_port: parse_env("SERVER_PORT").unwrap_or(defaults.server_port),
            sweep_interval: parse_env("SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
            redis: RedisSettings {
                url: env::var("REDIS_URL").ok().filter(|v| !v.is_empty()),
                host: env::var("REDIS_HOST").unwrap_or(redis_defaults.host),
                port: parse_env("REDIS_PORT").unwrap_or(redis_defaults.port),
                password: env::var("REDIS_PASSWORD").ok().filter(|v| !v.is_empty()),
                db: parse_env("REDIS_DB").unwrap_or(redis_defaults.db),
                connect_timeout: parse_env("REDIS_CONNECT_TIMEOUT_MS")
                    .map(Duration::from_millis)
                    .unwrap_or(redis_defaults.connect_timeout),
                command_timeout: parse_env("REDIS_COMMAND_TIMEOUT_MS")
                    .map(Duration::from_millis)
                    .unwrap_or(redis_defaults.command_timeout),
            },
        })
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            namespace: "cache".to_string(),
            server_port: 3000,
            sweep_interval: 0,
            redis: RedisSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.namespace, "cache");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.sweep_interval, 0);
        assert_eq!(config.redis.port, 6379);
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("memory".parse::<BackendKind>().unwrap(), BackendKind::Memory);
        assert_eq!(" Redis ".parse::<BackendKind>().unwrap(), BackendKind::Redis);
        assert!(matches!(
            "memcached".parse::<BackendKind>(),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_connection_url_from_parts() {
        let settings = RedisSettings::default();
        assert_eq!(settings.connection_url(), "redis://localhost:6379/0");

        let settings = RedisSettings {
            password: Some("secret".to_string()),
            db: 2,
            ..RedisSettings::default()
        };
        assert_eq!(settings.connection_url(), "redis://:secret@localhost:6379/2");
    }

    #[test]
    fn test_connection_url_prefers_explicit_url() {
        let settings = RedisSettings {
            url: Some("redis://cache.internal:6380/1".to_string()),
            ..RedisSettings::default()
        };
        assert_eq!(settings.connection_url(), "redis://cache.internal:6380/1");
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "CACHE_BACKEND",
            "CACHE_NAMESPACE",
            "SERVER_PORT",
            "SWEEP_INTERVAL",
            "REDIS_URL",
            "REDIS_HOST",
            "REDIS_PORT",
            "REDIS_PASSWORD",
            "REDIS_DB",
            "REDIS_CONNECT_TIMEOUT_MS",
            "REDIS_COMMAND_TIMEOUT_MS",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.namespace, "cache");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.redis.host, "localhost");
        assert_eq!(config.redis.command_timeout, Duration::from_millis(2000));
        assert!(config.redis.url.is_none());
    }
}
