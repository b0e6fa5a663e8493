//! Mappls API response DTOs.
//!
//! These map directly to the JSON bodies of the route, along-route and
//! token endpoints. Mappls omits fields freely, so most are optional.

use serde::Deserialize;

/// Response from the OAuth2 token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,

    /// Token lifetime in seconds.
    pub expires_in: Option<u64>,

    pub token_type: Option<String>,
}

/// Response from `route_adv`.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    /// Candidate routes; the first is the primary.
    pub routes: Option<Vec<Route>>,

    /// Status code string (e.g. "Ok", "NoRoute").
    pub code: Option<String>,

    /// Human-readable status message.
    pub msg: Option<String>,
}

/// A single route.
#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    /// Meters.
    pub distance: f64,

    /// Seconds.
    pub duration: f64,

    /// Encoded polyline when requested with `geometries=polyline`.
    pub geometry: Option<String>,

    pub legs: Option<Vec<RouteLeg>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteLeg {
    pub distance: Option<f64>,
    pub duration: Option<f64>,
    pub steps: Option<Vec<RouteStep>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteStep {
    pub maneuver: Option<Maneuver>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Maneuver {
    /// `[lng, lat]`.
    pub location: Option<Vec<f64>>,
}

/// Response from `places/along_route`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlongRouteResponse {
    #[serde(rename = "suggestedPOIs")]
    pub suggested_pois: Option<Vec<SuggestedPoi>>,
}

/// A point of interest near the route.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedPoi {
    /// Display label.
    pub poi: Option<String>,

    pub poplr_name: Option<String>,

    /// Category code, e.g. "TOLBRD" for toll booths.
    pub category: Option<String>,

    pub address: Option<String>,

    /// Meters from the route start.
    pub distance: Option<f64>,

    pub latitude: Option<f64>,

    pub longitude: Option<f64>,
}
