//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::EstimateError;
use crate::estimate::RouteQuery;
use crate::mappls::MapplsError;

use super::dto::*;
use super::state::AppState;

/// Shortest place search query forwarded to the provider.
const MIN_SEARCH_CHARS: usize = 2;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/mappls/route", get(route_cost))
        .route("/api/estimate", post(estimate))
        .route("/api/mappls/search", get(search_places))
        .route("/api/mappls/reverse-geocode", get(reverse_geocode))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Estimate a trip from query-string endpoints.
async fn route_cost(
    State(state): State<AppState>,
    params: Result<Query<RouteCostParams>, QueryRejection>,
) -> Result<Json<RouteCostResponse>, AppError> {
    let Query(params) = params?;
    run_estimate(&state, params.into_query()).await
}

/// Estimate a trip from a JSON body.
async fn estimate(
    State(state): State<AppState>,
    request: Result<Json<EstimateRequest>, JsonRejection>,
) -> Result<Json<RouteCostResponse>, AppError> {
    let Json(request) = request?;
    run_estimate(&state, request.into_query()).await
}

async fn run_estimate(
    state: &AppState,
    query: RouteQuery,
) -> Result<Json<RouteCostResponse>, AppError> {
    let estimate = state.estimator.estimate(&query).await?;
    Ok(Json(RouteCostResponse::from_estimate(&estimate)))
}

/// Free-text place search, passed through to Mappls.
async fn search_places(
    State(state): State<AppState>,
    params: Result<Query<PlaceSearchParams>, QueryRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Query(params) = params?;
    let query = params.query.trim();
    if query.chars().count() < MIN_SEARCH_CHARS {
        return Ok(Json(json!({ "suggestedLocations": [] })));
    }

    let results = state.mappls().search_places(query).await?;
    Ok(Json(results.as_ref().clone()))
}

/// Reverse geocode a position, passed through to Mappls.
async fn reverse_geocode(
    State(state): State<AppState>,
    params: Result<Query<ReverseGeocodeParams>, QueryRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Query(params) = params?;
    let Some((lat, lng)) = params.position() else {
        return Err(AppError::BadRequest {
            message: "lat and lng required".to_string(),
        });
    };

    let result = state.mappls().reverse_geocode(lat, lng).await?;
    Ok(Json(result))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    /// The upstream provider failed or refused us.
    BadGateway { message: String },
}

impl From<EstimateError> for AppError {
    fn from(e: EstimateError) -> Self {
        match e {
            EstimateError::Input(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            EstimateError::RouteNotFound { message } => AppError::NotFound { message },
            EstimateError::Auth(_) | EstimateError::Provider(_) => AppError::BadGateway {
                message: e.to_string(),
            },
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<MapplsError> for AppError {
    fn from(e: MapplsError) -> Self {
        AppError::BadGateway {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
        };

        if status.is_server_error() {
            error!(%status, "{message}");
        } else {
            warn!(%status, "{message}");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
