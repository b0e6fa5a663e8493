//! Error types for cost estimation.
//!
//! Only the toll lookup has a fallback; every error here reaches the caller.

use crate::mappls::MapplsError;

/// A route endpoint that cannot be sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// Neither a place-code nor a coordinate is usable
    #[error("{endpoint} needs a place-code or a lat/lng pair")]
    Unresolvable { endpoint: &'static str },

    /// The place-code is not a plain alphanumeric token
    #[error("{endpoint} place-code {code:?} is not a valid eLoc")]
    InvalidPlaceCode { endpoint: &'static str, code: String },
}

impl InputError {
    /// Which endpoint ("source" or "destination") was rejected.
    pub fn endpoint(&self) -> &'static str {
        match self {
            InputError::Unresolvable { endpoint } | InputError::InvalidPlaceCode { endpoint, .. } => {
                endpoint
            }
        }
    }
}

/// Bearer token acquisition failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("token request failed: {message}")]
pub struct AuthError {
    pub message: String,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors surfaced by a cost estimate request.
#[derive(Debug, thiserror::Error)]
pub enum EstimateError {
    /// Request endpoints could not be resolved
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    /// Could not obtain a provider token
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// The provider answered but found no route
    #[error("no route found: {message}")]
    RouteNotFound { message: String },

    /// Transport or HTTP failure talking to the provider
    #[error("route provider error: {0}")]
    Provider(MapplsError),
}

impl From<MapplsError> for EstimateError {
    fn from(err: MapplsError) -> Self {
        match err {
            MapplsError::Auth(e) => EstimateError::Auth(e),
            other => EstimateError::Provider(other),
        }
    }
}
