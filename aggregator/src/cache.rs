//! Cache contract for search results, keyed by the raw request token.

use crate::trips::Trips;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    /// Nothing stored under the key. Callers treat this as "go search",
    /// never as a failure.
    #[error("no cache hit")]
    NoCacheHit,
    #[error("cache backend error: {0}")]
    Backend(String),
    #[error("cache serialization error: {0}")]
    Serialization(String),
}

/// Read-through/write-behind store for merged search results.
///
/// The search path degrades gracefully on any error from either
/// method: a failing cache must never fail a search.
#[async_trait]
pub trait TripsCache: Send + Sync {
    async fn get(&self, token: &str) -> Result<Trips, CacheError>;

    async fn set(&self, token: &str, trips: &Trips) -> Result<(), CacheError>;
}
