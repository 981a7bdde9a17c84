//! In-Memory Cache Driver
//!
//! HashMap storage with lazy TTL eviction, guarded by an async RwLock so that
//! concurrent request handlers can share it safely.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::driver::effective_ttl;
use crate::cache::{CacheDriver, CacheEntry, Namespace};
use crate::health::ReadinessProbe;

// == Memory Store ==
/// Shared handle to a process-local key space.
///
/// Cloning the handle shares the storage. Drivers built on the same store
/// see each other's writes unless their namespaces differ.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // == Purge Expired ==
    /// Removes expired entries across all namespaces.
    ///
    /// Returns the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    /// Number of physically stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Whether an encoded key is physically present, expired or not.
    pub async fn contains_encoded(&self, encoded: &str) -> bool {
        self.entries.read().await.contains_key(encoded)
    }
}

// == In-Memory Cache Driver ==
#[derive(Debug, Clone)]
pub struct InMemoryCacheDriver {
    namespace: Namespace,
    store: MemoryStore,
}

impl InMemoryCacheDriver {
    /// Creates a driver over its own private store.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self::with_store(namespace, MemoryStore::new())
    }

    /// Creates a driver over an existing, possibly shared, store.
    pub fn with_store(namespace: impl Into<String>, store: MemoryStore) -> Self {
        Self {
            namespace: Namespace::new(namespace),
            store,
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    fn insert(
        &self,
        entries: &mut HashMap<String, CacheEntry>,
        key: &str,
        value: &[u8],
        ttl_seconds: u64,
    ) {
        let encoded = self.namespace.encode(key);
        if ttl_seconds == 0 {
            entries.remove(&encoded);
            return;
        }
        entries.insert(encoded, CacheEntry::new(value.to_vec(), ttl_seconds));
    }

    /// Lookup with lazy eviction; caller holds the write lock.
    fn lookup(&self, entries: &mut HashMap<String, CacheEntry>, key: &str) -> Option<Vec<u8>> {
        let encoded = self.namespace.encode(key);
        let expired = entries.get(&encoded)?.is_expired();

        if expired {
            entries.remove(&encoded);
            debug!("Evicted expired key {}", encoded);
            return None;
        }

        entries.get(&encoded).map(|entry| entry.value.clone())
    }
}

#[async_trait]
impl ReadinessProbe for InMemoryCacheDriver {
    async fn is_ready(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "InMemoryCacheDriver"
    }
}

#[async_trait]
impl CacheDriver for InMemoryCacheDriver {
    async fn keys(&self) -> HashSet<String> {
        let entries = self.store.entries.read().await;
        entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .filter_map(|(encoded, _)| self.namespace.decode(encoded))
            .map(str::to_string)
            .collect()
    }

    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut entries = self.store.entries.write().await;
        self.lookup(&mut entries, key)
    }

    async fn get_many(&self, keys: &[String]) -> HashMap<String, Vec<u8>> {
        let mut entries = self.store.entries.write().await;
        keys.iter()
            .filter_map(|key| {
                self.lookup(&mut entries, key)
                    .map(|value| (key.clone(), value))
            })
            .collect()
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<u64>) {
        let mut entries = self.store.entries.write().await;
        self.insert(&mut entries, key, value, effective_ttl(ttl));
    }

    async fn set_many(&self, values: &HashMap<String, Vec<u8>>, ttl: Option<u64>) {
        let ttl_seconds = effective_ttl(ttl);
        let mut entries = self.store.entries.write().await;
        for (key, value) in values {
            self.insert(&mut entries, key, value, ttl_seconds);
        }
    }

    async fn delete(&self, key: &str) {
        let mut entries = self.store.entries.write().await;
        entries.remove(&self.namespace.encode(key));
    }

    async fn delete_prefix(&self, prefix: &str) {
        let mut entries = self.store.entries.write().await;
        entries.retain(|encoded, _| !self.namespace.owns_with_prefix(encoded, prefix));
    }

    async fn flush_namespace(&self) {
        let mut entries = self.store.entries.write().await;
        let before = entries.len();
        entries.retain(|encoded, _| !self.namespace.owns(encoded));
        debug!(
            "Flushed {} entries from namespace {}",
            before - entries.len(),
            self.namespace
        );
    }
}
