//! Expiry Sweep Task
//!
//! Reads already evict expired entries lazily; this task additionally
//! reclaims entries that expire without ever being read again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryStore;

/// Spawns a background task that periodically purges expired entries from `store`.
///
/// The returned handle can be aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let store = MemoryStore::new();
/// let sweep_handle = spawn_sweep_task(store.clone(), 60);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(store: MemoryStore, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.purge_expired().await;
            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheDriver, InMemoryCacheDriver};

    #[tokio::test]
    async fn test_sweep_task_removes_expired_entries() {
        let store = MemoryStore::new();
        let driver = InMemoryCacheDriver::with_store("sweep", store.clone());

        driver.set("expire_soon", b"value", Some(1)).await;

        let handle = spawn_sweep_task(store.clone(), 1);

        // Wait for entry to expire and the sweep to run
        tokio::time::sleep(Duration::from_millis(2500)).await;

        // Removed physically without anyone reading it
        assert!(!store.contains_encoded("sweep:expire_soon").await);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_preserves_valid_entries() {
        let store = MemoryStore::new();
        let driver = InMemoryCacheDriver::with_store("sweep", store.clone());

        driver.set("long_lived", b"value", Some(3600)).await;

        let handle = spawn_sweep_task(store, 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(driver.get("long_lived").await, Some(b"value".to_vec()));

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let handle = spawn_sweep_task(MemoryStore::new(), 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
