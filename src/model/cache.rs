//! Time-bounded query cache for API responses

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// How long fetched Surah lists and Surah texts stay fresh
pub const QUERY_TTL: Duration = Duration::from_secs(60 * 60);

/// Cache of query results that expire `ttl` after being stored
#[derive(Clone)]
pub struct TtlCache<K, V> {
    entries: Arc<RwLock<HashMap<K, (Instant, V)>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|(stored_at, _)| stored_at.elapsed() < self.ttl)
            .map(|(_, value)| value.clone())
    }

    pub async fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < self.ttl);
        entries.insert(key, (Instant::now(), value));
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new(QUERY_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_entries_are_returned() {
        let cache: TtlCache<u32, String> = TtlCache::default();
        assert!(cache.get(&1).await.is_none());

        cache.insert(1, "Al-Fatiha".to_string()).await;
        assert_eq!(cache.get(&1).await.as_deref(), Some("Al-Fatiha"));
    }

    #[tokio::test]
    async fn test_expired_entries_are_dropped() {
        let cache: TtlCache<u32, u32> = TtlCache::new(Duration::from_millis(20));
        cache.insert(1, 7).await;

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get(&1).await.is_none());
    }
}
