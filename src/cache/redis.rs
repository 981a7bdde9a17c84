//! Redis Cache Driver
//!
//! Client-side driver over a remote Redis server. Keys are namespaced as
//! `"<namespace>:<key>"`; multi-key reads and writes go out in a single round
//! trip (MGET / pipeline); prefix deletion and namespace flushes enumerate the
//! matching keys with SCAN and delete them in one DEL.
//!
//! Every command runs under a timeout. Transport failures are logged and
//! degrade to a miss, an empty result or a dropped write.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{Client, Cmd, FromRedisValue, Pipeline, RedisResult};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, error, info};

use crate::cache::driver::effective_ttl;
use crate::cache::{CacheDriver, Namespace};
use crate::config::RedisSettings;
use crate::error::{CacheError, Result};
use crate::health::ReadinessProbe;

/// Keys requested per SCAN iteration.
const SCAN_BATCH_SIZE: usize = 500;

/// Largest EX Redis accepts without overflowing its millisecond expiry clock.
const MAX_EXPIRE_SECONDS: u64 = (i64::MAX / 2_000) as u64;

/// A cached connection tagged with the attempt that established it.
#[derive(Clone)]
struct Lease {
    id: u64,
    conn: MultiplexedConnection,
}

// == Redis Cache Driver ==
pub struct RedisCacheDriver {
    client: Client,
    namespace: Namespace,
    /// Established lazily, dropped after a broken or timed out round trip
    connection: Mutex<Option<Lease>>,
    next_lease: AtomicU64,
    connect_timeout: Duration,
    command_timeout: Duration,
}

impl std::fmt::Debug for RedisCacheDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheDriver")
            .field("namespace", &self.namespace)
            .field("connect_timeout", &self.connect_timeout)
            .field("command_timeout", &self.command_timeout)
            .finish_non_exhaustive()
    }
}

impl RedisCacheDriver {
    // == Constructors ==
    /// Creates a driver without touching the network.
    ///
    /// # Errors
    /// Returns `InvalidConfig` when the connection parameters do not form a valid Redis URL.
    pub fn new(settings: &RedisSettings, namespace: impl Into<String>) -> Result<Self> {
        let client = Client::open(settings.connection_url()).map_err(|e| {
            CacheError::InvalidConfig(format!("invalid redis connection settings: {}", e))
        })?;

        Ok(Self {
            client,
            namespace: Namespace::new(namespace),
            connection: Mutex::new(None),
            next_lease: AtomicU64::new(0),
            connect_timeout: settings.connect_timeout,
            command_timeout: settings.command_timeout,
        })
    }

    /// Creates a driver and verifies the server answers PING.
    ///
    /// # Errors
    /// Fails fast with `Connection` or `Timeout` when the server is unreachable.
    pub async fn connect(settings: &RedisSettings, namespace: impl Into<String>) -> Result<Self> {
        let driver = Self::new(settings, namespace)?;

        let pong: String = driver.query(&redis::cmd("PING")).await?;
        if pong != "PONG" {
            return Err(CacheError::Connection(format!(
                "unexpected PING reply: {}",
                pong
            )));
        }

        info!(
            "Redis cache driver connected for namespace {}",
            driver.namespace
        );
        Ok(driver)
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    // == Connection Handling ==
    /// Returns the cached connection or dials a new one.
    ///
    /// The slot is not held while dialing, so concurrent callers each wait at
    /// most `connect_timeout` when the server is down.
    async fn connection(&self) -> Result<Lease> {
        let cached = self.connection.lock().await.clone();
        if let Some(lease) = cached {
            return Ok(lease);
        }

        let conn = timeout(
            self.connect_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| {
            CacheError::Timeout(format!(
                "connecting to redis took longer than {:?}",
                self.connect_timeout
            ))
        })?
        .map_err(|e| CacheError::Connection(format!("failed to connect to redis: {}", e)))?;

        let mut slot = self.connection.lock().await;
        // another caller may have won the race; keep its connection
        let lease = slot.get_or_insert_with(|| {
            debug!("Established redis connection");
            Lease {
                id: self.next_lease.fetch_add(1, Ordering::Relaxed),
                conn,
            }
        });
        Ok(lease.clone())
    }

    /// Drops the cached connection if it is still the one identified by `lease_id`.
    async fn reset_connection(&self, lease_id: u64) {
        let mut slot = self.connection.lock().await;
        if slot.as_ref().is_some_and(|lease| lease.id == lease_id) {
            slot.take();
        }
    }

    /// Awaits one round trip under the command timeout.
    async fn round_trip<T, F>(&self, lease_id: u64, what: &str, fut: F) -> Result<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match timeout(self.command_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                // server error replies (WRONGTYPE, ...) leave the connection usable
                if e.is_unrecoverable_error() || e.is_io_error() {
                    self.reset_connection(lease_id).await;
                }
                Err(CacheError::Transport(e))
            }
            Err(_) => {
                // the multiplexed connection may still hold the late reply
                self.reset_connection(lease_id).await;
                Err(CacheError::Timeout(format!(
                    "{} took longer than {:?}",
                    what, self.command_timeout
                )))
            }
        }
    }

    async fn query<T: FromRedisValue>(&self, cmd: &Cmd) -> Result<T> {
        let mut lease = self.connection().await?;
        let lease_id = lease.id;
        self.round_trip(
            lease_id,
            "redis command",
            cmd.query_async::<T>(&mut lease.conn),
        )
        .await
    }

    async fn query_pipeline(&self, pipe: &Pipeline) -> Result<()> {
        let mut lease = self.connection().await?;
        let lease_id = lease.id;
        self.round_trip(
            lease_id,
            "redis pipeline",
            pipe.query_async::<()>(&mut lease.conn),
        )
        .await
    }

    // == Key Enumeration ==
    /// Encoded keys matching a glob, collected with SCAN.
    async fn scan(&self, pattern: &str) -> Result<Vec<String>> {
        let mut cursor: u64 = 0;
        let mut found = Vec::new();

        loop {
            let mut cmd = redis::cmd("SCAN");
            cmd.arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH_SIZE);

            let (next, batch): (u64, Vec<String>) = self.query(&cmd).await?;
            found.extend(batch);

            if next == 0 {
                break;
            }
            cursor = next;
        }

        // SCAN may return a key more than once
        found.sort_unstable();
        found.dedup();
        Ok(found)
    }

    /// Deletes every key matching `pattern`; no DEL is sent when nothing matched.
    async fn delete_matching(&self, pattern: &str) -> Result<usize> {
        let keys = self.scan(pattern).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        let mut cmd = redis::cmd("DEL");
        cmd.arg(&keys);
        let _: i64 = self.query(&cmd).await?;
        Ok(keys.len())
    }

    fn set_cmd(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Cmd {
        let encoded = self.namespace.encode(key);
        if ttl_seconds == 0 {
            let mut cmd = redis::cmd("DEL");
            cmd.arg(encoded);
            return cmd;
        }

        // clamped so a far-future TTL still lands instead of being rejected
        let mut cmd = redis::cmd("SET");
        cmd.arg(encoded)
            .arg(value)
            .arg("EX")
            .arg(ttl_seconds.min(MAX_EXPIRE_SECONDS));
        cmd
    }
}

#[async_trait]
impl ReadinessProbe for RedisCacheDriver {
    async fn is_ready(&self) -> bool {
        match self.query::<String>(&redis::cmd("PING")).await {
            Ok(_) => true,
            Err(e) => {
                error!("RedisCacheDriver readiness check failed: {}", e);
                false
            }
        }
    }

    fn name(&self) -> &str {
        "RedisCacheDriver"
    }
}

#[async_trait]
impl CacheDriver for RedisCacheDriver {
    async fn keys(&self) -> HashSet<String> {
        match self.scan(&self.namespace.flush_pattern()).await {
            Ok(encoded) => encoded
                .iter()
                .filter_map(|key| self.namespace.decode(key))
                .map(str::to_string)
                .collect(),
            Err(e) => {
                error!("RedisCacheDriver failed to list keys: {}", e);
                HashSet::new()
            }
        }
    }

    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(self.namespace.encode(key));

        self.query::<Option<Vec<u8>>>(&cmd)
            .await
            .unwrap_or_else(|e| {
                error!("RedisCacheDriver failed to get key={}: {}", key, e);
                None
            })
    }

    async fn get_many(&self, keys: &[String]) -> HashMap<String, Vec<u8>> {
        if keys.is_empty() {
            return HashMap::new();
        }

        let mut cmd = redis::cmd("MGET");
        cmd.arg(self.namespace.encode_all(keys));

        match self.query::<Vec<Option<Vec<u8>>>>(&cmd).await {
            Ok(values) => keys
                .iter()
                .zip(values)
                .filter_map(|(key, value)| value.map(|v| (key.clone(), v)))
                .collect(),
            Err(e) => {
                error!("RedisCacheDriver failed to get keys={:?}: {}", keys, e);
                HashMap::new()
            }
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<u64>) {
        let cmd = self.set_cmd(key, value, effective_ttl(ttl));
        if let Err(e) = self.query::<()>(&cmd).await {
            error!("RedisCacheDriver failed to set key={}: {}", key, e);
        }
    }

    async fn set_many(&self, entries: &HashMap<String, Vec<u8>>, ttl: Option<u64>) {
        if entries.is_empty() {
            return;
        }

        let ttl_seconds = effective_ttl(ttl);
        let mut pipe = redis::pipe();
        for (key, value) in entries {
            pipe.add_command(self.set_cmd(key, value, ttl_seconds))
                .ignore();
        }

        if let Err(e) = self.query_pipeline(&pipe).await {
            error!(
                "RedisCacheDriver failed to set {} keys: {}",
                entries.len(),
                e
            );
        }
    }

    async fn delete(&self, key: &str) {
        let mut cmd = redis::cmd("DEL");
        cmd.arg(self.namespace.encode(key));

        if let Err(e) = self.query::<i64>(&cmd).await {
            error!("RedisCacheDriver failed to delete key={}: {}", key, e);
        }
    }

    async fn delete_prefix(&self, prefix: &str) {
        match self
            .delete_matching(&self.namespace.prefix_pattern(prefix))
            .await
        {
            Ok(count) => debug!("Deleted {} keys with prefix {}", count, prefix),
            Err(e) => error!(
                "RedisCacheDriver failed to delete keys with prefix={}: {}",
                prefix, e
            ),
        }
    }

    async fn flush_namespace(&self) {
        match self.delete_matching(&self.namespace.flush_pattern()).await {
            Ok(count) => info!(
                "Flushed {} keys from namespace {}",
                count, self.namespace
            ),
            Err(e) => error!(
                "RedisCacheDriver failed to flush namespace {}: {}",
                self.namespace, e
            ),
        }
    }
}
