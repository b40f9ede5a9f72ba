//! In-memory TTL cache for upstream lookup results
//!
//! Entries are keyed by strings derived deterministically from the call
//! arguments (city name, coordinates + date range). A lookup returns the
//! stored value only while it is fresh; expired entries are dropped on
//! access. Concurrent writers for the same key race last-writer-wins, which
//! is fine here since identical keys always map to value-equal results.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct StoredEntry<V> {
    value: V,
    expires_at: Instant,
}

/// String-keyed cache with a fixed time-to-live per instance
pub struct TtlCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, StoredEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Stores a value under `key`, replacing any previous entry.
    pub fn put(&self, key: &str, value: V) {
        let entry = StoredEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), entry);
    }

    /// Retrieves a value if it exists and has not expired.
    /// Returns `None` for cache misses or expired entries.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => {
                tracing::debug!(key, "cache hit");
                Some(entry.value.clone())
            }
            Some(_) => {
                tracing::debug!(key, "cache entry expired");
                entries.remove(key);
                None
            }
            None => {
                tracing::debug!(key, "cache miss");
                None
            }
        }
    }

    /// Number of stored entries, expired ones included until next access.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
