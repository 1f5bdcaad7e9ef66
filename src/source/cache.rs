//! Best-effort TTL cache

use crate::clock::Clock;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Key/value cache with per-entry expiry
#[async_trait]
pub trait Cache<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    /// Unexpired value for `key`
    async fn get(&self, key: &str) -> Option<V>;
    /// Store `value` for `ttl`
    async fn set(&self, key: &str, value: V, ttl: Duration);
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// In-process cache whose expiry is measured on the injected clock
pub struct MemoryCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    clock: Arc<dyn Clock>,
}

impl<V: Clone + Send + Sync + 'static> MemoryCache<V> {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Drop expired entries, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl<V: Clone + Send + Sync + 'static> Cache<V> for MemoryCache<V> {
    async fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|e| e.expires_at > now)
            .map(|e| e.value.clone())
    }

    async fn set(&self, key: &str, value: V, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), CacheEntry { value, expires_at });
    }
}

/// Cache key shared by every permutation of the same symbol set
pub fn batch_key<S: AsRef<str>>(symbols: &[S]) -> String {
    let set: BTreeSet<&str> = symbols.iter().map(|s| s.as_ref()).collect();
    set.into_iter().collect::<Vec<_>>().join(",")
}
