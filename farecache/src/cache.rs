//! The trips cache: key derivation, binary encoding, and compression
//! composed over a byte store.

use crate::compression::Compression;
use crate::config::CacheConfig;
use crate::keys::cache_key;
use crate::metrics_defs::{DECODE_FAILURES, PAYLOAD_BYTES};
use crate::serializer;
use crate::store::{ByteStore, MemoryStore};
use aggregator::{CacheError, Trips, TripsCache};
use async_trait::async_trait;
use shared::{counter, histogram};
use std::time::Duration;

pub struct TokenCache {
    store: Box<dyn ByteStore>,
    compression: Compression,
}

impl TokenCache {
    pub fn new(store: Box<dyn ByteStore>, compression: Compression) -> Self {
        TokenCache { store, compression }
    }

    /// In-process cache sized and aged per the config.
    pub fn in_memory(config: &CacheConfig) -> Self {
        let store = MemoryStore::new(config.max_entries, Duration::from_secs(config.ttl_secs));
        TokenCache::new(Box::new(store), config.compression)
    }
}

#[async_trait]
impl TripsCache for TokenCache {
    async fn get(&self, token: &str) -> Result<Trips, CacheError> {
        let key = cache_key(token);
        let Some(stored) = self.store.get(&key) else {
            return Err(CacheError::NoCacheHit);
        };

        let raw = self.compression.decompress(&stored).map_err(|e| {
            counter!(DECODE_FAILURES).increment(1);
            tracing::debug!(error = %e, "stored payload failed to decompress");
            CacheError::Serialization(e.to_string())
        })?;
        serializer::decode(&raw).map_err(|e| {
            counter!(DECODE_FAILURES).increment(1);
            tracing::debug!(error = %e, "stored payload failed to decode");
            CacheError::Serialization(e.to_string())
        })
    }

    async fn set(&self, token: &str, trips: &Trips) -> Result<(), CacheError> {
        let raw = serializer::encode(trips)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;
        let payload = self
            .compression
            .compress(&raw)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;

        histogram!(PAYLOAD_BYTES).record(payload.len() as f64);
        self.store.insert(&cache_key(token), payload);
        Ok(())
    }
}
