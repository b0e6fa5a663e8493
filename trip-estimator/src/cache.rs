//! Caching layer for Mappls API responses.
//!
//! Every route request uses the same trucking profile, so a route depends
//! only on its coordinate string. Place searches are cached by normalised
//! query text. Toll lookups and reverse geocodes are not cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::{CoordinateString, EstimateError, PoiRecord, RouteResult};
use crate::estimate::{RouteProvider, TollProvider};
use crate::mappls::{MapplsClient, MapplsError};

/// Cached place search response.
type PlaceEntry = Arc<serde_json::Value>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached routes.
    pub route_ttl: Duration,

    /// TTL for cached place searches.
    pub place_ttl: Duration,

    /// Maximum number of entries per cache.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            route_ttl: Duration::from_secs(10 * 60),
            place_ttl: Duration::from_secs(60 * 60),
            max_capacity: 1000,
        }
    }
}

/// Cache for Mappls API responses.
pub struct MapplsCache {
    /// Routes keyed by coordinate string.
    routes: MokaCache<CoordinateString, RouteResult>,

    /// Place search results keyed by normalised query.
    places: MokaCache<String, PlaceEntry>,
}

impl MapplsCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.route_ttl)
            .max_capacity(config.max_capacity)
            .build();
        let places = MokaCache::builder()
            .time_to_live(config.place_ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { routes, places }
    }

    /// Cache key for a place search: trimmed and lowercased.
    fn place_key(query: &str) -> String {
        query.trim().to_lowercase()
    }

    pub async fn get_route(&self, key: &CoordinateString) -> Option<RouteResult> {
        self.routes.get(key).await
    }

    pub async fn insert_route(&self, key: CoordinateString, route: RouteResult) {
        self.routes.insert(key, route).await;
    }

    pub async fn get_places(&self, query: &str) -> Option<PlaceEntry> {
        self.places.get(&Self::place_key(query)).await
    }

    pub async fn insert_places(&self, query: &str, entry: PlaceEntry) {
        self.places.insert(Self::place_key(query), entry).await;
    }
}

/// Mappls client with caching.
///
/// Wraps a `MapplsClient` and caches successful routes and place searches.
/// Failures are never cached.
pub struct CachedMapplsClient {
    client: MapplsClient,
    cache: MapplsCache,
}

impl CachedMapplsClient {
    /// Create a new cached client.
    pub fn new(client: MapplsClient, cache_config: &CacheConfig) -> Self {
        Self {
            client,
            cache: MapplsCache::new(cache_config),
        }
    }

    /// Search places, using cache if available.
    pub async fn search_places(&self, query: &str) -> Result<PlaceEntry, MapplsError> {
        if let Some(cached) = self.cache.get_places(query).await {
            debug!(query, "place search cache hit");
            return Ok(cached);
        }

        let entry = Arc::new(self.client.search_places(query.trim()).await?);
        self.cache.insert_places(query, entry.clone()).await;

        Ok(entry)
    }

    /// Reverse geocode a position. Not cached.
    pub async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<serde_json::Value, MapplsError> {
        self.client.reverse_geocode(lat, lng).await
    }
}

impl RouteProvider for CachedMapplsClient {
    async fn fetch_route(
        &self,
        coordinates: &CoordinateString,
        vehicle_class: &str,
    ) -> Result<RouteResult, EstimateError> {
        if let Some(cached) = self.cache.get_route(coordinates).await {
            debug!(%coordinates, "route cache hit");
            return Ok(cached);
        }

        let route = self.client.fetch_route(coordinates, vehicle_class).await?;
        self.cache
            .insert_route(coordinates.clone(), route.clone())
            .await;

        Ok(route)
    }
}

impl TollProvider for CachedMapplsClient {
    async fn pois_along(
        &self,
        geometry: &str,
        buffer_meters: u32,
    ) -> Result<Vec<PoiRecord>, EstimateError> {
        self.client.pois_along(geometry, buffer_meters).await
    }
}
