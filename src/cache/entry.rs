//! Cache Entry Module
//!
//! Defines the structure for individual in-process cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored bytes
    pub value: Vec<u8>,
    /// Lifetime in seconds, counted from `created_at`
    pub ttl_seconds: u64,
    /// Monotonic creation time
    pub created_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    pub fn new(value: Vec<u8>, ttl_seconds: u64) -> Self {
        Self {
            value,
            ttl_seconds,
            created_at: Instant::now(),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once its age is strictly greater than its TTL.
    /// A zero TTL is expired from the moment it is written.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against an explicit instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        if self.ttl_seconds == 0 {
            return true;
        }
        now.saturating_duration_since(self.created_at) > self.ttl()
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new(b"test_value".to_vec(), 60);

        assert_eq!(entry.value, b"test_value");
        assert_eq!(entry.ttl_seconds, 60);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        // Create entry with 1 second TTL
        let entry = CacheEntry::new(b"test_value".to_vec(), 1);

        assert!(!entry.is_expired());

        // Wait for expiration
        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new(b"test".to_vec(), 10);

        // Exactly at the TTL the entry is still alive; one tick later it is not
        assert!(!entry.is_expired_at(entry.created_at + Duration::from_secs(10)));
        assert!(entry.is_expired_at(entry.created_at + Duration::from_millis(10_001)));
    }

    #[test]
    fn test_zero_ttl_is_expired_immediately() {
        let entry = CacheEntry::new(b"gone".to_vec(), 0);
        assert!(entry.is_expired_at(entry.created_at));
    }
}
