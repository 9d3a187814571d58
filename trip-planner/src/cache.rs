//! Caching layer for directions responses.
//!
//! Repeating an aggregation for an unchanged selection (re-rendering the
//! comparison view, toggling the selected mode) would otherwise re-issue
//! four identical provider requests. Responses are keyed by the full
//! query, so any change to endpoints, waypoints or mode misses.
//!
//! Only `OK` responses are cached. `ZERO_RESULTS` and friends may be
//! transient on the provider side, and transport errors never are
//! cacheable.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::directions::{DirectionsError, DirectionsProvider, DirectionsQuery, DirectionsResponse};

const OK_STATUS: &str = "OK";

/// Configuration for the response cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
        }
    }
}

/// Directions provider with caching.
///
/// Wraps any `DirectionsProvider` and serves repeated queries from memory.
pub struct CachedDirectionsClient<P> {
    provider: P,
    responses: MokaCache<DirectionsQuery, DirectionsResponse>,
}

impl<P: DirectionsProvider + Sync> CachedDirectionsClient<P> {
    /// Create a new cached client.
    pub fn new(provider: P, config: &CacheConfig) -> Self {
        let responses = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            provider,
            responses,
        }
    }

    /// Access the underlying provider for requests that bypass the cache.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Number of cached responses.
    pub fn cache_entry_count(&self) -> u64 {
        self.responses.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.responses.invalidate_all();
    }
}

impl<P: DirectionsProvider + Sync> DirectionsProvider for CachedDirectionsClient<P> {
    async fn get_directions(
        &self,
        query: &DirectionsQuery,
    ) -> Result<DirectionsResponse, DirectionsError> {
        if let Some(cached) = self.responses.get(query).await {
            debug!(mode = %query.mode, "Directions cache hit");
            return Ok(cached);
        }

        let response = self.provider.get_directions(query).await?;

        if response.status == OK_STATUS {
            self.responses.insert(query.clone(), response.clone()).await;
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directions::{MockDirectionsClient, MockReply};
    use crate::domain::{PlaceId, TravelMode};

    fn query(mode: TravelMode, waypoints: &[&str]) -> DirectionsQuery {
        let waypoints: Vec<_> = waypoints.iter().map(|w| PlaceId::parse(w).unwrap()).collect();
        DirectionsQuery::between_places(
            &PlaceId::parse("X").unwrap(),
            &PlaceId::parse("Y").unwrap(),
            &waypoints,
            mode,
        )
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 1000);
    }

    #[tokio::test]
    async fn ok_responses_are_cached() {
        let mock = MockDirectionsClient::from_dir("data/fixtures").unwrap();
        let cached = CachedDirectionsClient::new(mock.clone(), &CacheConfig::default());

        let first = cached.get_directions(&query(TravelMode::Driving, &[])).await.unwrap();
        let second = cached.get_directions(&query(TravelMode::Driving, &[])).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(mock.query_count(), 1);
    }

    #[tokio::test]
    async fn different_queries_miss() {
        let mock = MockDirectionsClient::from_dir("data/fixtures").unwrap();
        let cached = CachedDirectionsClient::new(mock.clone(), &CacheConfig::default());

        cached.get_directions(&query(TravelMode::Driving, &[])).await.unwrap();
        cached.get_directions(&query(TravelMode::Driving, &["A"])).await.unwrap();
        cached.get_directions(&query(TravelMode::Walking, &[])).await.unwrap();

        assert_eq!(mock.query_count(), 3);
    }

    #[tokio::test]
    async fn non_ok_statuses_are_not_cached() {
        let mock = MockDirectionsClient::from_dir("data/fixtures").unwrap();
        let cached = CachedDirectionsClient::new(mock.clone(), &CacheConfig::default());

        for _ in 0..2 {
            let response = cached
                .get_directions(&query(TravelMode::Bicycling, &[]))
                .await
                .unwrap();
            assert_eq!(response.status, "ZERO_RESULTS");
        }

        assert_eq!(mock.query_count(), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let mock = MockDirectionsClient::new();
        mock.set_reply(TravelMode::Transit, MockReply::TransportFailure("reset".into()))
            .await;
        let cached = CachedDirectionsClient::new(mock.clone(), &CacheConfig::default());

        assert!(cached.get_directions(&query(TravelMode::Transit, &[])).await.is_err());
        assert!(cached.get_directions(&query(TravelMode::Transit, &[])).await.is_err());
        assert_eq!(mock.query_count(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let mock = MockDirectionsClient::from_dir("data/fixtures").unwrap();
        let cached = CachedDirectionsClient::new(mock.clone(), &CacheConfig::default());

        cached.get_directions(&query(TravelMode::Walking, &[])).await.unwrap();
        cached.invalidate_cache();
        cached.get_directions(&query(TravelMode::Walking, &[])).await.unwrap();

        assert_eq!(mock.query_count(), 2);
    }
}
