//! Data transfer objects for web requests and responses.
//!
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, Endpoint, RouteResult};
use crate::estimate::{Estimate, RouteQuery, TollCandidate, TollResult};

/// Query string of `GET /api/mappls/route`.
///
/// Numbers arrive as text and are parsed leniently: a blank or malformed
/// coordinate counts as absent and a malformed fuel price as zero.
#[derive(Debug, Default, Deserialize)]
pub struct RouteCostParams {
    #[serde(rename = "sourceELoc")]
    pub source_eloc: Option<String>,

    #[serde(rename = "destELoc")]
    pub dest_eloc: Option<String>,

    #[serde(rename = "startLat")]
    pub start_lat: Option<String>,

    #[serde(rename = "startLng")]
    pub start_lng: Option<String>,

    #[serde(rename = "endLat")]
    pub end_lat: Option<String>,

    #[serde(rename = "endLng")]
    pub end_lng: Option<String>,

    /// Vehicle class key (e.g. "2AxlesTruck")
    #[serde(rename = "vehicleType")]
    pub vehicle_type: Option<String>,

    /// Diesel price per litre
    #[serde(rename = "fuelPrice")]
    pub fuel_price: Option<String>,
}

impl RouteCostParams {
    pub fn into_query(self) -> RouteQuery {
        let source = endpoint(
            self.source_eloc,
            parse_number(self.start_lat.as_deref()),
            parse_number(self.start_lng.as_deref()),
        );
        let destination = endpoint(
            self.dest_eloc,
            parse_number(self.end_lat.as_deref()),
            parse_number(self.end_lng.as_deref()),
        );
        let fuel_price = parse_number(self.fuel_price.as_deref());
        build_query(source, destination, self.vehicle_type, fuel_price)
    }
}

/// One end of a route in a JSON request body.
#[derive(Debug, Default, Deserialize)]
pub struct EndpointRequest {
    /// Mappls place-code
    #[serde(rename = "eLoc")]
    pub eloc: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl EndpointRequest {
    fn into_endpoint(self) -> Endpoint {
        endpoint(self.eloc, self.lat, self.lng)
    }
}

/// Body of `POST /api/estimate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub source: EndpointRequest,
    pub destination: EndpointRequest,
    pub vehicle_class: Option<String>,
    pub fuel_price_per_unit: Option<f64>,
}

impl EstimateRequest {
    pub fn into_query(self) -> RouteQuery {
        build_query(
            self.source.into_endpoint(),
            self.destination.into_endpoint(),
            self.vehicle_class,
            self.fuel_price_per_unit,
        )
    }
}

fn endpoint(place_code: Option<String>, lat: Option<f64>, lng: Option<f64>) -> Endpoint {
    Endpoint {
        place_code,
        coordinate: lat.zip(lng).map(|(lat, lng)| Coordinate::new(lat, lng)),
    }
}

/// Parse a query-string number; blank, malformed and non-finite values
/// are `None`.
fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn build_query(
    source: Endpoint,
    destination: Endpoint,
    vehicle_class: Option<String>,
    fuel_price: Option<f64>,
) -> RouteQuery {
    let mut query = RouteQuery::new(source, destination).with_fuel_price(fuel_price.unwrap_or(0.0));
    if let Some(class) = vehicle_class.filter(|c| !c.is_empty()) {
        query = query.with_vehicle_class(class);
    }
    query
}

/// Query string of `GET /api/mappls/search`.
#[derive(Debug, Deserialize)]
pub struct PlaceSearchParams {
    #[serde(default)]
    pub query: String,
}

/// Query string of `GET /api/mappls/reverse-geocode`.
#[derive(Debug, Default, Deserialize)]
pub struct ReverseGeocodeParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

impl ReverseGeocodeParams {
    /// Both components, if present and numeric.
    pub fn position(&self) -> Option<(f64, f64)> {
        parse_number(self.lat.as_deref()).zip(parse_number(self.lng.as_deref()))
    }
}

/// A position in a response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<Coordinate> for LatLng {
    fn from(c: Coordinate) -> Self {
        Self {
            lat: c.lat,
            lng: c.lng,
        }
    }
}

/// Response for a route cost estimate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteCostResponse {
    pub route: RouteSummary,
    pub trip_cost: TripCost,
}

impl RouteCostResponse {
    pub fn from_estimate(estimate: &Estimate) -> Self {
        Self {
            route: RouteSummary::from_route(&estimate.route),
            trip_cost: TripCost::from_estimate(estimate),
        }
    }
}

/// The route as returned by the provider, plus display text.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    /// Metres
    pub distance: f64,
    /// Seconds
    pub duration: f64,
    /// Encoded polyline
    pub geometry: String,
    pub distance_text: String,
    pub duration_text: String,
    pub start_coords: Option<LatLng>,
    pub end_coords: Option<LatLng>,
}

impl RouteSummary {
    pub fn from_route(route: &RouteResult) -> Self {
        Self {
            distance: route.distance_meters,
            duration: route.duration_seconds,
            geometry: route.geometry.clone(),
            distance_text: route.distance_text(),
            duration_text: route.duration_text(),
            start_coords: route.start_coordinate.map(LatLng::from),
            end_coords: route.end_coordinate.map(LatLng::from),
        }
    }
}

/// Itemised cost of a trip.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripCost {
    /// Vehicle class as requested; label and axles describe the profile
    /// actually used, which is the default for unknown classes
    pub vehicle_type: String,
    pub vehicle_label: String,
    pub axles: u32,
    pub fuel: FuelResult,
    pub tolls: TollsResult,
    pub driver: DriverResult,
    pub maintenance: MaintenanceResult,
    pub total_estimate: u64,
}

impl TripCost {
    pub fn from_estimate(estimate: &Estimate) -> Self {
        let vehicle = estimate.vehicle;
        let cost = &estimate.cost;

        Self {
            vehicle_type: estimate.requested_class.clone(),
            vehicle_label: vehicle.label.to_string(),
            axles: vehicle.axle_count,
            fuel: FuelResult {
                litres: cost.fuel.units,
                price_per_litre: cost.fuel.unit_price,
                total_cost: cost.fuel.total_cost,
                mileage: format!("{} km / l", vehicle.fuel_efficiency),
            },
            tolls: TollsResult::from_tolls(&cost.tolls),
            driver: DriverResult {
                daily_allowance: cost.driver.allowance,
                driving_pay: cost.driver.driving_pay,
                total_cost: cost.driver.total_cost,
            },
            maintenance: MaintenanceResult {
                rate_per_km: cost.maintenance.rate_per_km,
                total_cost: cost.maintenance.total_cost,
            },
            total_estimate: cost.total_estimate,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelResult {
    pub litres: f64,
    pub price_per_litre: f64,
    pub total_cost: u64,
    /// e.g. "4 km / l"
    pub mileage: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TollsResult {
    pub count: u32,
    pub cost_per_plaza: u32,
    pub total_cost: u64,
    pub plazas: Vec<PlazaResult>,
    /// "live" or "heuristic"
    pub source: &'static str,
}

impl TollsResult {
    pub fn from_tolls(tolls: &TollResult) -> Self {
        Self {
            count: tolls.count,
            cost_per_plaza: tolls.cost_per_unit,
            total_cost: tolls.total_cost,
            plazas: tolls
                .candidates
                .iter()
                .map(|c| PlazaResult::from_candidate(c, tolls.cost_per_unit))
                .collect(),
            source: tolls.source.as_str(),
        }
    }
}

/// A toll plaza found on the route.
#[derive(Debug, Serialize)]
pub struct PlazaResult {
    pub name: String,
    pub address: String,
    /// Distance into the route, e.g. "10.3 km"
    pub distance: String,
    pub cost: u32,
    pub location: Option<LatLng>,
}

impl PlazaResult {
    pub fn from_candidate(candidate: &TollCandidate, cost: u32) -> Self {
        Self {
            name: candidate.name.clone(),
            address: candidate.address.clone(),
            distance: format!("{:.1} km", candidate.distance_into_route_meters / 1000.0),
            cost,
            location: candidate.coordinate.map(LatLng::from),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverResult {
    pub daily_allowance: u64,
    pub driving_pay: u64,
    pub total_cost: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceResult {
    pub rate_per_km: u32,
    pub total_cost: u64,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
