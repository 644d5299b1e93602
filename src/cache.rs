//! In-process cache with per-entry expiry.
//!
//! Owned by whoever builds the aggregator and passed in explicitly, so each
//! test gets its own instance. Reads share a lock; writes are last-write-wins.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

struct CacheEntry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    ttl: Option<Duration>,
}

impl<V: Clone> TtlCache<V> {
    /// `ttl: None` keeps entries for the lifetime of the process.
    #[must_use]
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the live value for `key`. Expired entries are dropped.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write();
        // Another writer may have refreshed the entry in between.
        if entries.get(key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(key);
        }
        entries
            .get(key)
            .filter(|e| !e.is_expired(now))
            .map(|e| e.value.clone())
    }

    pub fn insert(&self, key: impl Into<String>, value: V) {
        let expires_at = self.ttl.map(|ttl| Instant::now() + ttl);
        self.entries
            .write()
            .insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Number of unexpired entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .values()
            .filter(|e| !e.is_expired(now))
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
