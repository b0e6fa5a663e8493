//! Mappls (MapmyIndia) API client.
//!
//! This module provides an HTTP client for the Mappls routing and Atlas
//! APIs, which supply road routes and points of interest for India.
//!
//! Key characteristics of Mappls:
//! - Routing takes a static REST key in the URL path
//! - Atlas endpoints (search, POIs along a route) need an OAuth2 bearer
//!   token obtained with client credentials, cached by [`CredentialCache`]
//! - Locations are either `lng,lat` pairs or opaque place-codes (eLoc),
//!   which the routing endpoint accepts interchangeably

mod auth;
mod client;
mod convert;
mod error;
mod types;

pub use auth::{CredentialCache, EXPIRY_MARGIN, OAuthTokenSource, TokenGrant, TokenSource};
pub use client::{MapplsClient, MapplsConfig};
pub use convert::{convert_pois, convert_route};
pub use error::MapplsError;
pub use types::{AlongRouteResponse, RouteResponse, SuggestedPoi, TokenResponse};
