//! Byte-level storage behind the trips cache.

use moka::sync::Cache;
use std::time::Duration;

/// Keyed byte storage with backend-owned expiry. Implementations are
/// addressed by the already-derived cache key, never the raw token.
pub trait ByteStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    fn insert(&self, key: &str, value: Vec<u8>);
}

/// In-process store with bounded capacity and a fixed time-to-live.
pub struct MemoryStore {
    cache: Cache<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        MemoryStore { cache }
    }
}

impl ByteStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.cache.get(key)
    }

    fn insert(&self, key: &str, value: Vec<u8>) {
        self.cache.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_returns_bytes() {
        let store = MemoryStore::new(10, Duration::from_secs(60));
        assert!(store.get("k").is_none());
        store.insert("k", vec![1, 2, 3]);
        assert_eq!(store.get("k"), Some(vec![1, 2, 3]));
    }
}
