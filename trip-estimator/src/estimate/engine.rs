//! Route cost estimation.

use std::future::Future;

use tokio::time::timeout;
use tracing::{debug, info};

use crate::domain::{CoordinateString, Endpoint, EstimateError, PoiRecord, RouteResult};
use crate::mappls::MapplsError;

use super::config::EstimatorConfig;
use super::cost::{CostEstimate, compose};
use super::resolve::resolve;
use super::tolls::estimate_tolls;
use super::vehicles::{self, DEFAULT_VEHICLE_CLASS, VehicleProfile};

/// Source of routes between two locations.
///
/// This abstraction allows the estimator to be tested with mock data.
pub trait RouteProvider {
    /// Fetch the primary route for a resolved coordinate string.
    ///
    /// Fails with [`EstimateError::RouteNotFound`] when the provider has no
    /// route, and [`EstimateError::Provider`] on transport or HTTP failure.
    fn fetch_route(
        &self,
        coordinates: &CoordinateString,
        vehicle_class: &str,
    ) -> impl Future<Output = Result<RouteResult, EstimateError>> + Send;
}

/// Source of points of interest along a route geometry.
pub trait TollProvider {
    /// Toll-category POIs within `buffer_meters` of the encoded path, in
    /// provider order.
    fn pois_along(
        &self,
        geometry: &str,
        buffer_meters: u32,
    ) -> impl Future<Output = Result<Vec<PoiRecord>, EstimateError>> + Send;
}

/// A request to price a trip.
#[derive(Debug, Clone)]
pub struct RouteQuery {
    pub source: Endpoint,
    pub destination: Endpoint,
    /// Defaults to [`DEFAULT_VEHICLE_CLASS`].
    pub vehicle_class: Option<String>,
    /// Price per litre; zero when unknown.
    pub fuel_price_per_unit: f64,
}

impl RouteQuery {
    pub fn new(source: Endpoint, destination: Endpoint) -> Self {
        Self {
            source,
            destination,
            vehicle_class: None,
            fuel_price_per_unit: 0.0,
        }
    }

    pub fn with_vehicle_class(mut self, class: impl Into<String>) -> Self {
        self.vehicle_class = Some(class.into());
        self
    }

    pub fn with_fuel_price(mut self, price: f64) -> Self {
        self.fuel_price_per_unit = price;
        self
    }
}

/// The route and its priced breakdown.
#[derive(Debug, Clone)]
pub struct Estimate {
    pub route: RouteResult,
    /// Vehicle class as requested, which may not be in the profile table.
    pub requested_class: String,
    /// Profile the trip was priced with.
    pub vehicle: &'static VehicleProfile,
    pub cost: CostEstimate,
}

/// Estimates trip costs using a route/POI provider.
pub struct Estimator<P> {
    provider: P,
    config: EstimatorConfig,
}

impl<P> Estimator<P>
where
    P: RouteProvider + TollProvider + Sync,
{
    pub fn new(provider: P, config: EstimatorConfig) -> Self {
        Self { provider, config }
    }

    /// The underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Price a trip.
    ///
    /// Resolution, routing and authentication failures are returned. A
    /// failed toll lookup is not: the toll count falls back to a distance
    /// estimate and the result says so.
    pub async fn estimate(&self, query: &RouteQuery) -> Result<Estimate, EstimateError> {
        let coordinates = resolve(&query.source, &query.destination)?;
        let requested_class = query
            .vehicle_class
            .as_deref()
            .unwrap_or(DEFAULT_VEHICLE_CLASS);
        let vehicle = vehicles::lookup(requested_class);

        debug!(%coordinates, vehicle = vehicle.class, "estimating route cost");

        let route = timeout(
            self.config.call_timeout,
            self.provider.fetch_route(&coordinates, vehicle.class),
        )
        .await
        .map_err(|_| EstimateError::Provider(MapplsError::Timeout))??;

        let tolls = estimate_tolls(&self.provider, &route, vehicle.axle_count, &self.config).await;
        let cost = compose(
            &route,
            vehicle,
            tolls,
            query.fuel_price_per_unit,
            &self.config,
        );

        info!(
            distance_km = route.distance_km(),
            vehicle = vehicle.class,
            tolls = cost.tolls.count,
            toll_source = cost.tolls.source.as_str(),
            total = cost.total_estimate,
            "route cost estimated"
        );

        Ok(Estimate {
            route,
            requested_class: requested_class.to_string(),
            vehicle,
            cost,
        })
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
