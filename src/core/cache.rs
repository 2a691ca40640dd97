use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;
use tracing::debug;

/// Source of "now" for cache expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: StdMutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: StdMutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    pub value: V,
    pub fetched_at: DateTime<Utc>,
}

/// In-memory cache where every entry is valid for a fixed `ttl` after it was
/// stored. Stale entries are kept until overwritten.
#[derive(Clone)]
pub struct Cache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Mutex<HashMap<K, CacheEntry<V>>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Send + Sync + Debug + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            clock,
        }
    }

    /// Returns the value if it was stored less than `ttl` ago.
    pub async fn get(&self, key: &K) -> Option<V> {
        let cache = self.inner.lock().await;
        match cache.get(key) {
            Some(entry) if self.clock.now() - entry.fetched_at < self.ttl => {
                debug!(?key, "Cache HIT");
                Some(entry.value.clone())
            }
            Some(_) => {
                debug!(?key, "Cache entry expired");
                None
            }
            None => {
                debug!(?key, "Cache MISS");
                None
            }
        }
    }

    /// Raw entry lookup, ignoring expiry.
    pub async fn entry(&self, key: &K) -> Option<CacheEntry<V>> {
        self.inner.lock().await.get(key).cloned()
    }

    pub async fn put(&self, key: K, value: V) {
        let entry = CacheEntry {
            value,
            fetched_at: self.clock.now(),
        };
        let mut cache = self.inner.lock().await;
        debug!(?key, "Cache PUT");
        cache.insert(key, entry);
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cache() -> (Cache<String, i32>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let cache = Cache::with_clock(Duration::seconds(60), clock.clone());
        (cache, clock)
    }

    #[tokio::test]
    async fn test_cache_get_put() {
        let (cache, _) = test_cache();

        // Initially, cache is empty
        assert!(cache.get(&"key1".to_string()).await.is_none());

        cache.put("key1".to_string(), 123).await;
        assert_eq!(cache.get(&"key1".to_string()).await, Some(123));

        assert!(cache.get(&"key2".to_string()).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_ttl_expiration() {
        let (cache, clock) = test_cache();
        cache.put("key1".to_string(), 123).await;

        clock.advance(Duration::seconds(59));
        assert_eq!(cache.get(&"key1".to_string()).await, Some(123));

        // Exactly at the ttl the entry is stale
        clock.advance(Duration::seconds(1));
        assert!(cache.get(&"key1".to_string()).await.is_none());

        // Stale entries stay around until overwritten
        assert_eq!(cache.entry(&"key1".to_string()).await.unwrap().value, 123);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_cache_overwrite_refreshes_timestamp() {
        let (cache, clock) = test_cache();
        cache.put("key1".to_string(), 1).await;
        let first = cache.entry(&"key1".to_string()).await.unwrap().fetched_at;

        clock.advance(Duration::seconds(90));
        cache.put("key1".to_string(), 2).await;

        let entry = cache.entry(&"key1".to_string()).await.unwrap();
        assert_eq!(entry.value, 2);
        assert_eq!(entry.fetched_at - first, Duration::seconds(90));
        assert_eq!(cache.get(&"key1".to_string()).await, Some(2));
    }
}
