//! Mappls HTTP client.
//!
//! Covers the routing endpoint (keyed by API key in the path) and the
//! Atlas endpoints (place search, along-route POIs, reverse geocode) that
//! take a bearer token from the [`CredentialCache`].

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::{CoordinateString, EstimateError, PoiRecord, RouteResult};
use crate::estimate::{RouteProvider, TollProvider};

use super::auth::{CredentialCache, DEFAULT_TOKEN_URL, OAuthTokenSource};
use super::convert::{convert_pois, convert_route};
use super::error::MapplsError;
use super::types::{AlongRouteResponse, RouteResponse};

/// Default base URL for the routing API.
const DEFAULT_API_BASE_URL: &str = "https://apis.mappls.com";

/// Default base URL for the Atlas (search/POI) API.
const DEFAULT_ATLAS_BASE_URL: &str = "https://atlas.mappls.com";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Default per-request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Travel profile for every route request; this service plans lorry trips.
const ROUTE_PROFILE: &str = "trucking";

/// Category filter for the along-route search.
const TOLL_CATEGORY: &str = "TOLL";

/// Configuration for the Mappls client.
#[derive(Debug, Clone)]
pub struct MapplsConfig {
    /// Static REST key used by the routing and reverse-geocode APIs
    pub api_key: String,
    /// OAuth2 client id
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: String,
    /// Base URL for the routing API
    pub api_base_url: String,
    /// Base URL for the Atlas API
    pub atlas_base_url: String,
    /// Token endpoint URL
    pub token_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl MapplsConfig {
    /// Create a new config with the given credentials.
    pub fn new(
        api_key: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            atlas_base_url: DEFAULT_ATLAS_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Point every endpoint at one base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.api_base_url = url.clone();
        self.atlas_base_url = url.clone();
        self.token_url = format!("{url}/api/security/oauth/token");
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Mappls API client.
///
/// Cheap to clone; clones share the HTTP pool, the request semaphore and
/// the token cache.
#[derive(Clone)]
pub struct MapplsClient {
    http: reqwest::Client,
    api_key: String,
    api_base_url: String,
    atlas_base_url: String,
    semaphore: Arc<Semaphore>,
    credentials: Arc<CredentialCache<OAuthTokenSource>>,
}

impl MapplsClient {
    /// Create a new Mappls client with the given configuration.
    pub fn new(config: MapplsConfig) -> Result<Self, MapplsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let token_source = OAuthTokenSource::new(
            http.clone(),
            config.token_url,
            config.client_id,
            config.client_secret,
        );

        Ok(Self {
            http,
            api_key: config.api_key,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            atlas_base_url: config.atlas_base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
            credentials: Arc::new(CredentialCache::new(token_source)),
        })
    }

    /// Compute routes between the given locations.
    ///
    /// Alternatives are disabled and ferries excluded; the geometry comes
    /// back as an encoded polyline.
    pub async fn route_adv(
        &self,
        coordinates: &CoordinateString,
    ) -> Result<RouteResponse, MapplsError> {
        let url = format!(
            "{}/advancedmaps/v1/{}/route_adv/{}/{}",
            self.api_base_url, self.api_key, ROUTE_PROFILE, coordinates
        );

        debug!(%coordinates, "requesting route");
        let request = self.http.get(&url).query(&[
            ("geometries", "polyline"),
            ("overview", "full"),
            ("steps", "true"),
            ("alternatives", "false"),
            ("exclude", "ferry"),
        ]);

        self.send_json(request).await
    }

    /// Search for points of interest in a category along an encoded path.
    pub async fn along_route(
        &self,
        geometry: &str,
        category: &str,
        buffer_meters: u32,
    ) -> Result<AlongRouteResponse, MapplsError> {
        let token = self.credentials.get_token().await?;
        let url = format!("{}/api/places/along_route", self.atlas_base_url);

        debug!(category, buffer_meters, "requesting POIs along route");
        let buffer = buffer_meters.to_string();
        let request = self
            .http
            .get(&url)
            .query(&[
                ("path", geometry),
                ("category", category),
                ("buffer", buffer.as_str()),
            ])
            .header(reqwest::header::AUTHORIZATION, format!("bearer {token}"));

        let _permit = self.acquire().await?;
        let response = request.send().await?;

        // No POIs in range.
        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(AlongRouteResponse {
                suggested_pois: None,
            });
        }

        let result = read_json(response).await;
        self.forget_rejected_token(&token, result).await
    }

    /// Free-text place search, returning the provider's JSON unchanged.
    pub async fn search_places(&self, query: &str) -> Result<serde_json::Value, MapplsError> {
        let token = self.credentials.get_token().await?;
        let url = format!("{}/api/places/search/json", self.atlas_base_url);

        let request = self
            .http
            .get(&url)
            .query(&[
                ("query", query),
                ("region", "IND"),
                ("tokenizeAddress", "true"),
            ])
            .header(reqwest::header::AUTHORIZATION, format!("bearer {token}"));

        let result = self.send_json(request).await;
        self.forget_rejected_token(&token, result).await
    }

    /// Reverse geocode a position, returning the provider's JSON unchanged.
    pub async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<serde_json::Value, MapplsError> {
        let url = format!(
            "{}/advancedmaps/v1/{}/rev_geocode",
            self.api_base_url, self.api_key
        );

        let request = self
            .http
            .get(&url)
            .query(&[("lat", lat.to_string()), ("lng", lng.to_string())]);

        self.send_json(request).await
    }

    /// Drop the cached token if the provider rejected the one we sent.
    async fn forget_rejected_token<T>(
        &self,
        token: &str,
        result: Result<T, MapplsError>,
    ) -> Result<T, MapplsError> {
        if matches!(result, Err(MapplsError::Unauthorized)) {
            warn!("Mappls rejected the bearer token, discarding it");
            self.credentials.invalidate(token).await;
        }
        result
    }

    async fn acquire(&self) -> Result<tokio::sync::SemaphorePermit<'_>, MapplsError> {
        self.semaphore
            .acquire()
            .await
            .map_err(|_| MapplsError::ApiError {
                status: 0,
                message: "Semaphore closed".to_string(),
            })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, MapplsError> {
        let _permit = self.acquire().await?;
        let response = request.send().await?;
        read_json(response).await
    }
}

/// Map the status code to an error, then decode the body.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, MapplsError> {
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(MapplsError::Unauthorized);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(MapplsError::ApiError {
            status: status.as_u16(),
            message: body,
        });
    }

    let body = response.text().await?;

    serde_json::from_str(&body).map_err(|e| MapplsError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })
}

impl RouteProvider for MapplsClient {
    async fn fetch_route(
        &self,
        coordinates: &CoordinateString,
        vehicle_class: &str,
    ) -> Result<RouteResult, EstimateError> {
        debug!(vehicle_class, "fetching {ROUTE_PROFILE} route");
        let response = self.route_adv(coordinates).await?;

        convert_route(&response).ok_or_else(|| EstimateError::RouteNotFound {
            message: response
                .msg
                .clone()
                .unwrap_or_else(|| "No route found".to_string()),
        })
    }
}

impl TollProvider for MapplsClient {
    async fn pois_along(
        &self,
        geometry: &str,
        buffer_meters: u32,
    ) -> Result<Vec<PoiRecord>, EstimateError> {
        let response = self
            .along_route(geometry, TOLL_CATEGORY, buffer_meters)
            .await?;
        Ok(convert_pois(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = MapplsConfig::new("key", "id", "secret")
            .with_base_url("http://localhost:8080")
            .with_max_concurrent(2)
            .with_timeout(3);

        assert_eq!(config.api_key, "key");
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.atlas_base_url, "http://localhost:8080");
        assert_eq!(
            config.token_url,
            "http://localhost:8080/api/security/oauth/token"
        );
        assert_eq!(config.max_concurrent, 2);
        assert_eq!(config.timeout_secs, 3);
    }

    #[test]
    fn config_defaults() {
        let config = MapplsConfig::new("key", "id", "secret");

        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.atlas_base_url, DEFAULT_ATLAS_BASE_URL);
        assert_eq!(config.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn client_creation() {
        let config = MapplsConfig::new("key", "id", "secret");
        assert!(MapplsClient::new(config).is_ok());
    }
}
