//! TTL-based bounded cache for schedule payloads.
//!
//! Provides a thread-safe cache with automatic expiration and a capacity
//! bound. Entries past their TTL stop being served by `get` immediately but
//! are only dropped by an explicit `cleanup_expired` pass; capacity overflow
//! is resolved by evicting the single oldest-inserted entry (insertion
//! order, not LRU).

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// A thread-safe cache with time-to-live expiration and a capacity bound.
pub struct BoundedTtlCache<K, V> {
    inner: RwLock<Inner<K, V>>,
    ttl: Duration,
    capacity: usize,
}

struct Inner<K, V> {
    entries: HashMap<K, Entry<V>>,
    /// Keys in first-insertion order; re-inserting an existing key does not
    /// move it.
    insertion_order: VecDeque<K>,
}

struct Entry<V> {
    value: V,
    fetched_at: Instant,
}

impl<K, V> BoundedTtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    /// Create a new cache with the specified TTL and capacity.
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: HashMap::new(),
                insertion_order: VecDeque::new(),
            }),
            ttl,
            capacity,
        }
    }

    /// Insert a value, replacing any existing entry and resetting the TTL.
    pub async fn insert(&self, key: K, value: V) {
        self.insert_entry(key, value, Instant::now()).await;
    }

    /// Insert a value with an explicit timestamp (tests only).
    #[cfg(test)]
    pub async fn insert_at(&self, key: K, value: V, fetched_at: Instant) {
        self.insert_entry(key, value, fetched_at).await;
    }

    async fn insert_entry(&self, key: K, value: V, fetched_at: Instant) {
        let mut inner = self.inner.write().await;
        if !inner.entries.contains_key(&key) {
            inner.insertion_order.push_back(key.clone());
        }
        inner.entries.insert(key, Entry { value, fetched_at });
    }

    /// Get a value if it exists and hasn't expired.
    pub async fn get(&self, key: &K) -> Option<V> {
        let inner = self.inner.read().await;
        inner.entries.get(key).and_then(|entry| {
            if entry.fetched_at.elapsed() < self.ttl {
                Some(entry.value.clone())
            } else {
                None
            }
        })
    }

    /// Get a value regardless of expiration.
    pub async fn peek(&self, key: &K) -> Option<V> {
        let inner = self.inner.read().await;
        inner.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Remove all entries.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.entries.clear();
        inner.insertion_order.clear();
    }

    /// Remove all expired entries and return the count of removed entries.
    pub async fn cleanup_expired(&self) -> usize {
        let mut inner = self.inner.write().await;
        let before = inner.entries.len();
        let ttl = self.ttl;
        let Inner {
            entries,
            insertion_order,
        } = &mut *inner;
        entries.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
        insertion_order.retain(|key| entries.contains_key(key));
        before - entries.len()
    }

    /// If the cache exceeds its capacity, evict the single oldest-inserted
    /// entry and return its key.
    pub async fn evict_overflow(&self) -> Option<K> {
        let mut inner = self.inner.write().await;
        if inner.entries.len() <= self.capacity {
            return None;
        }
        let oldest = inner.insertion_order.pop_front()?;
        inner.entries.remove(&oldest);
        Some(oldest)
    }

    /// Get the current number of entries (including expired ones not yet
    /// cleaned).
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    /// Check if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(ttl_ms: u64, capacity: usize) -> BoundedTtlCache<String, i32> {
        BoundedTtlCache::new(Duration::from_millis(ttl_ms), capacity)
    }

    #[tokio::test]
    async fn insert_and_get() {
        let cache = cache(60_000, 20);
        cache.insert("key".to_string(), 42).await;
        assert_eq!(cache.get(&"key".to_string()).await, Some(42));
    }

    #[tokio::test]
    async fn get_returns_none_for_missing() {
        let cache = cache(60_000, 20);
        assert_eq!(cache.get(&"missing".to_string()).await, None);
    }

    #[tokio::test]
    async fn expired_entries_not_returned() {
        let cache = cache(10, 20);
        let expired_at = Instant::now() - Duration::from_millis(11);
        cache.insert_at("key".to_string(), 42, expired_at).await;

        assert_eq!(cache.get(&"key".to_string()).await, None);
    }

    #[tokio::test]
    async fn peek_ignores_expiration() {
        let cache = cache(10, 20);
        let expired_at = Instant::now() - Duration::from_millis(11);
        cache.insert_at("key".to_string(), 42, expired_at).await;

        assert_eq!(cache.peek(&"key".to_string()).await, Some(42));
    }

    #[tokio::test]
    async fn cleanup_removes_expired() {
        let cache = cache(10, 20);
        let expired_at = Instant::now() - Duration::from_millis(11);
        cache.insert_at("old1".to_string(), 1, expired_at).await;
        cache.insert_at("old2".to_string(), 2, expired_at).await;
        cache.insert("fresh".to_string(), 3).await;

        let removed = cache.cleanup_expired().await;
        assert_eq!(removed, 2);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get(&"fresh".to_string()).await, Some(3));
    }

    #[tokio::test]
    async fn overflow_evicts_the_first_inserted_entry() {
        let cache = cache(60_000, 3);
        for i in 0..4 {
            cache.insert(format!("key{}", i), i).await;
        }

        assert_eq!(cache.evict_overflow().await, Some("key0".to_string()));
        assert_eq!(cache.len().await, 3);
        assert_eq!(cache.get(&"key0".to_string()).await, None);
        assert_eq!(cache.get(&"key1".to_string()).await, Some(1));
        // A second pass finds nothing over capacity.
        assert_eq!(cache.evict_overflow().await, None);
    }

    #[tokio::test]
    async fn reinserting_does_not_reset_insertion_order() {
        let cache = cache(60_000, 2);
        cache.insert("a".to_string(), 1).await;
        cache.insert("b".to_string(), 2).await;
        cache.insert("a".to_string(), 10).await;
        cache.insert("c".to_string(), 3).await;

        // "a" keeps its original slot at the front of the order.
        assert_eq!(cache.evict_overflow().await, Some("a".to_string()));
    }

    #[tokio::test]
    async fn clear_empties_the_cache() {
        let cache = cache(60_000, 20);
        cache.insert("key".to_string(), 42).await;
        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
