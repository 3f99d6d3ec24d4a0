//! Search orchestration: cache lookup, parallel provider fan-out with a
//! deadline, and lowest-price merge of whatever arrived in time.

use crate::cache::{CacheError, TripsCache};
use crate::metrics_defs::{
    CACHE_HIT, CACHE_MISS, PROVIDERS_ABORTED, PROVIDER_FAILURES, SEARCH_DURATION,
};
use crate::provider::Provider;
use crate::sro::Sro;
use crate::trips::Trips;
use shared::{counter, histogram};
use std::pin::pin;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::Instant;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search token")]
    InvalidToken,
    #[error("deadline exceeded before the search could start")]
    DeadlineExceeded,
}

pub struct SearchService {
    providers: Vec<Arc<dyn Provider>>,
    cache: Arc<dyn TripsCache>,
}

impl SearchService {
    pub fn new(cache: Arc<dyn TripsCache>) -> Self {
        Self {
            providers: Vec::new(),
            cache,
        }
    }

    pub fn add_provider(&mut self, provider: Arc<dyn Provider>) {
        self.providers.push(provider);
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Resolves a token to a merged, deduplicated offer list.
    ///
    /// The cache is consulted first; on a hit the providers are never
    /// queried. On a miss every available provider is fanned out in
    /// parallel, and when `deadline` fires the stragglers are aborted
    /// and whatever merged so far is returned. A search where every
    /// provider fails still succeeds with an empty result; only a bad
    /// token or an already-expired deadline is an error.
    pub async fn search_by_token(
        &self,
        token: &str,
        deadline: Instant,
    ) -> Result<Trips, SearchError> {
        if Instant::now() >= deadline {
            return Err(SearchError::DeadlineExceeded);
        }

        match self.cache.get(token).await {
            Ok(trips) => {
                counter!(CACHE_HIT).increment(1);
                return Ok(trips);
            }
            Err(CacheError::NoCacheHit) => {
                counter!(CACHE_MISS).increment(1);
            }
            Err(e) => {
                // Treat a broken cache like a miss.
                counter!(CACHE_MISS).increment(1);
                tracing::error!(error = %e, "cache lookup failed");
            }
        }

        let request = Sro::from_token(token).map_err(|_| SearchError::InvalidToken)?;

        let started = Instant::now();
        let trips = self.fan_out(&request, deadline).await;
        histogram!(SEARCH_DURATION).record(started.elapsed().as_secs_f64());

        if let Err(e) = self.cache.set(token, &trips).await {
            tracing::debug!(error = %e, "cache store failed");
        }

        Ok(trips)
    }

    async fn fan_out(&self, request: &Sro, deadline: Instant) -> Trips {
        let mut join_set = JoinSet::new();

        for provider in &self.providers {
            if !provider.is_available() {
                tracing::debug!(provider = provider.name(), "skipping unavailable provider");
                continue;
            }
            let provider = provider.clone();
            let request = request.clone();
            join_set.spawn(async move {
                let name = provider.name().to_string();
                let result = provider.search(&request).await;
                (name, result)
            });
        }

        let mut merged = Trips::new();
        let mut timeout = pin!(tokio::time::sleep_until(deadline));

        loop {
            tokio::select! {
                _ = &mut timeout => {
                    let aborted = join_set.len();
                    if aborted > 0 {
                        counter!(PROVIDERS_ABORTED).increment(aborted as u64);
                        tracing::warn!(aborted, "deadline reached, aborting slow providers");
                    }
                    join_set.abort_all();
                    break;
                }
                join_result = join_set.join_next() => {
                    match join_result {
                        Some(Ok((name, Ok(trips)))) => {
                            tracing::debug!(provider = %name, offers = trips.len(), "provider answered");
                            merged.merge(trips);
                        }
                        Some(Ok((name, Err(e)))) => {
                            counter!(PROVIDER_FAILURES, "provider" => name.clone()).increment(1);
                            tracing::warn!(provider = %name, error = %e, "provider failed");
                        }
                        Some(Err(e)) => {
                            if !e.is_cancelled() {
                                tracing::error!(error = %e, "provider task panicked");
                            }
                        }
                        None => break,
                    }
                }
            }
        }

        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, TripsCache};
    use crate::provider::{Provider, ProviderError};
    use crate::stub::StubGds;
    use crate::trips::testutils::trip;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const TOKEN: &str = "AKV40000OWE1000001110MOWLED20241015";

    #[derive(Default)]
    struct MockCache {
        stored: Mutex<Option<Trips>>,
        gets: AtomicUsize,
        sets: AtomicUsize,
    }

    #[async_trait]
    impl TripsCache for MockCache {
        async fn get(&self, _token: &str) -> Result<Trips, CacheError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            match self.stored.lock().unwrap().clone() {
                Some(trips) => Ok(trips),
                None => Err(CacheError::NoCacheHit),
            }
        }

        async fn set(&self, _token: &str, trips: &Trips) -> Result<(), CacheError> {
            self.sets.fetch_add(1, Ordering::SeqCst);
            *self.stored.lock().unwrap() = Some(trips.clone());
            Ok(())
        }
    }

    struct BrokenCache;

    #[async_trait]
    impl TripsCache for BrokenCache {
        async fn get(&self, _token: &str) -> Result<Trips, CacheError> {
            Err(CacheError::Backend("connection refused".to_string()))
        }

        async fn set(&self, _token: &str, _trips: &Trips) -> Result<(), CacheError> {
            Err(CacheError::Backend("connection refused".to_string()))
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl Provider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn search(&self, _request: &Sro) -> Result<Trips, ProviderError> {
            Err(ProviderError::Upstream("boom".to_string()))
        }
    }

    struct OfflineProvider;

    #[async_trait]
    impl Provider for OfflineProvider {
        fn name(&self) -> &str {
            "offline"
        }

        fn is_available(&self) -> bool {
            false
        }

        async fn search(&self, _request: &Sro) -> Result<Trips, ProviderError> {
            panic!("must never be queried");
        }
    }

    fn deadline_in(millis: u64) -> Instant {
        Instant::now() + Duration::from_millis(millis)
    }

    #[tokio::test]
    async fn merges_fast_providers_and_drops_failed_and_slow_ones() {
        let cache = Arc::new(MockCache::default());
        let mut service = SearchService::new(cache.clone());
        service.add_provider(Arc::new(StubGds::new(
            "fast",
            Duration::from_millis(0),
            5,
        )));
        service.add_provider(Arc::new(StubGds::new(
            "slow",
            Duration::from_secs(60),
            5,
        )));
        service.add_provider(Arc::new(FailingProvider));

        let trips = service
            .search_by_token(TOKEN, deadline_in(500))
            .await
            .unwrap();

        assert_eq!(trips.len(), 5);
        assert!(trips.iter().all(|t| t.provider.name == "fast"));
        assert_eq!(cache.sets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_deadline_touches_nothing() {
        let cache = Arc::new(MockCache::default());
        let mut service = SearchService::new(cache.clone());
        service.add_provider(Arc::new(OfflineProvider));

        let result = service
            .search_by_token(TOKEN, Instant::now() - Duration::from_millis(1))
            .await;

        assert!(matches!(result, Err(SearchError::DeadlineExceeded)));
        assert_eq!(cache.gets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cache_hit_short_circuits_providers() {
        let cache = Arc::new(MockCache::default());
        let mut cached = Trips::new();
        cached.add(trip("cached", 42.0));
        *cache.stored.lock().unwrap() = Some(cached);

        let mut service = SearchService::new(cache.clone());
        service.add_provider(Arc::new(OfflineProvider));

        let trips = service
            .search_by_token(TOKEN, deadline_in(500))
            .await
            .unwrap();

        assert_eq!(trips.len(), 1);
        assert!(trips.contains("cached"));
        assert_eq!(cache.sets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_token_is_rejected_after_cache_miss() {
        let cache = Arc::new(MockCache::default());
        let service = SearchService::new(cache.clone());

        let result = service.search_by_token("too-short", deadline_in(500)).await;

        assert!(matches!(result, Err(SearchError::InvalidToken)));
        assert_eq!(cache.gets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn all_providers_failing_yields_empty_success() {
        let cache = Arc::new(MockCache::default());
        let mut service = SearchService::new(cache.clone());
        service.add_provider(Arc::new(FailingProvider));

        let trips = service
            .search_by_token(TOKEN, deadline_in(500))
            .await
            .unwrap();

        assert!(trips.is_empty());
        // "No offers" is a completed search and is cached like any other.
        assert_eq!(cache.sets.load(Ordering::SeqCst), 1);

        // A repeat search within the TTL is a cache hit, not a re-dispatch.
        let again = service
            .search_by_token(TOKEN, deadline_in(500))
            .await
            .unwrap();
        assert!(again.is_empty());
        assert_eq!(cache.gets.load(Ordering::SeqCst), 2);
        assert_eq!(cache.sets.load(Ordering::SeqCst), 1);
    }

    /// Would contribute an offer if the fan-out ever queried it.
    struct HiddenProvider;

    #[async_trait]
    impl Provider for HiddenProvider {
        fn name(&self) -> &str {
            "hidden"
        }

        fn is_available(&self) -> bool {
            false
        }

        async fn search(&self, request: &Sro) -> Result<Trips, ProviderError> {
            StubGds::new("hidden", Duration::from_millis(0), 1)
                .search(request)
                .await
        }
    }

    #[tokio::test]
    async fn unavailable_provider_is_never_queried() {
        let cache = Arc::new(MockCache::default());
        let mut service = SearchService::new(cache);
        service.add_provider(Arc::new(StubGds::new(
            "fast",
            Duration::from_millis(0),
            3,
        )));
        service.add_provider(Arc::new(HiddenProvider));

        let trips = service
            .search_by_token(TOKEN, deadline_in(500))
            .await
            .unwrap();

        assert_eq!(trips.len(), 3);
        assert!(!trips.contains("hidden-0"));
        assert!(trips.iter().all(|t| t.provider.name == "fast"));
    }

    #[tokio::test]
    async fn broken_cache_degrades_to_live_search() {
        let mut service = SearchService::new(Arc::new(BrokenCache));
        service.add_provider(Arc::new(StubGds::new(
            "fast",
            Duration::from_millis(0),
            2,
        )));

        let trips = service
            .search_by_token(TOKEN, deadline_in(500))
            .await
            .unwrap();

        assert_eq!(trips.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_cache_ids_across_providers_keep_lowest_price() {
        // Two stubs with the same name fabricate identical cache ids
        // but the same prices, so the count proves dedup happened.
        let cache = Arc::new(MockCache::default());
        let mut service = SearchService::new(cache);
        service.add_provider(Arc::new(StubGds::new(
            "twin",
            Duration::from_millis(0),
            3,
        )));
        service.add_provider(Arc::new(StubGds::new(
            "twin",
            Duration::from_millis(0),
            3,
        )));

        let trips = service
            .search_by_token(TOKEN, deadline_in(500))
            .await
            .unwrap();

        assert_eq!(trips.len(), 3);
    }
}
