//! Cache Driver Contract
//!
//! The capability interface every backend implements. Callers hold an
//! `Arc<dyn CacheDriver>` and never name the concrete backend.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::cache::DEFAULT_TTL_SECONDS;
use crate::error::{CacheError, Result};
use crate::health::ReadinessProbe;

/// Decoded form of a structured payload: a key-ordered JSON object.
pub type StructuredValue = Map<String, Value>;

/// Resolves an optional caller TTL against the contract default.
pub fn effective_ttl(ttl: Option<u64>) -> u64 {
    ttl.unwrap_or(DEFAULT_TTL_SECONDS)
}

// == Cache Driver ==
/// Namespaced byte-oriented cache.
///
/// None of the primitive operations can fail from the caller's point of
/// view: a backend that cannot be reached behaves like an empty cache that
/// drops writes, and logs what happened.
#[async_trait]
pub trait CacheDriver: ReadinessProbe {
    /// Raw keys (namespace stripped) currently visible in this namespace.
    async fn keys(&self) -> HashSet<String>;

    /// Value for `key`, or None when missing, expired or unreachable.
    async fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Values for every key that resolved; misses are left out.
    async fn get_many(&self, keys: &[String]) -> HashMap<String, Vec<u8>>;

    /// Stores `value` under `key`, overwriting unconditionally.
    ///
    /// `ttl` is in seconds, None means [`DEFAULT_TTL_SECONDS`]; zero removes the key.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<u64>);

    /// Same as repeated [`set`](Self::set), batched where the backend allows.
    async fn set_many(&self, entries: &HashMap<String, Vec<u8>>, ttl: Option<u64>);

    /// Removes `key` if present.
    async fn delete(&self, key: &str);

    /// Removes every key of this namespace whose raw key starts with `prefix`.
    async fn delete_prefix(&self, prefix: &str);

    /// Removes every key of this namespace and nothing else.
    async fn flush_namespace(&self);

    // == Structured Helpers ==
    /// Decodes the JSON object stored under `key`.
    ///
    /// A missing key is `Ok(None)`; a payload that is not a JSON object is an error.
    async fn get_structured(&self, key: &str) -> Result<Option<StructuredValue>> {
        match self.get(key).await {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Encodes `value` as JSON and stores it under `key`.
    ///
    /// Only JSON objects are accepted; anything else is rejected before
    /// touching the backend.
    async fn set_structured(&self, key: &str, value: &Value, ttl: Option<u64>) -> Result<()> {
        let Value::Object(map) = value else {
            return Err(CacheError::InvalidInput(format!(
                "structured value for key '{}' must be a JSON object",
                key
            )));
        };

        let bytes = serde_json::to_vec(map)?;
        self.set(key, &bytes, ttl).await;
        Ok(())
    }
}
