//! Statistics cache - a per-user, TTL'd snapshot store.
//!
//! Entries are keyed `stats_<user_id>` and populated lazily by the
//! statistics read path. Correctness never depends on the cache being
//! consistent; it only depends on eventual invalidation, which the
//! transaction write and delete hooks perform for the affected user.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::trace;

/// Default time-to-live for cached snapshots: 15 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

struct CacheEntry {
    inserted_at: Instant,
    value: serde_json::Value,
}

/// In-process snapshot cache with per-entry expiry.
pub struct StatsCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl Default for StatsCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl StatsCache {
    /// Creates a cache whose entries expire `ttl` after insertion.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The cache key for one user's statistics snapshot.
    #[must_use]
    pub fn stats_key(user_id: i64) -> String {
        format!("stats_{user_id}")
    }

    /// Returns the cached value for `key`, or None when absent or expired.
    pub async fn get(&self, key: &str) -> Option<serde_json::Value> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if entry.inserted_at.elapsed() >= self.ttl {
            trace!(key, "cache entry expired");
            return None;
        }
        Some(entry.value.clone())
    }

    /// Stores `value` under `key`, restarting its TTL.
    pub async fn set(&self, key: String, value: serde_json::Value) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                inserted_at: Instant::now(),
                value,
            },
        );
    }

    /// Removes `key` from the cache, if present.
    pub async fn delete(&self, key: &str) {
        let mut entries = self.entries.write().await;
        entries.remove(key);
    }

    /// Evicts the statistics snapshot for one user. Called by the
    /// transaction create, update, and delete hooks.
    pub async fn invalidate_user(&self, user_id: i64) {
        let key = Self::stats_key(user_id);
        trace!(key, "invalidating statistics cache");
        self.delete(&key).await;
    }
}
