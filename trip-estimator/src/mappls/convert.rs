//! Conversion from Mappls DTOs to domain types.

use crate::domain::{Coordinate, PoiRecord, RouteResult};

use super::types::{AlongRouteResponse, RouteResponse, SuggestedPoi};

/// Extract the primary route, or `None` if the provider returned no routes.
///
/// Endpoint coordinates come from the first and last maneuver of the first
/// leg, since the route object itself does not carry them reliably.
pub fn convert_route(response: &RouteResponse) -> Option<RouteResult> {
    let route = response.routes.as_ref()?.first()?;

    let steps = route
        .legs
        .as_ref()
        .and_then(|legs| legs.first())
        .and_then(|leg| leg.steps.as_deref())
        .unwrap_or_default();

    let maneuver_coordinate = |index: usize| {
        steps
            .get(index)
            .and_then(|step| step.maneuver.as_ref())
            .and_then(|m| m.location.as_deref())
            .and_then(Coordinate::from_lng_lat)
    };

    let (start_coordinate, end_coordinate) = match steps.len() {
        0 => (None, None),
        n => (maneuver_coordinate(0), maneuver_coordinate(n - 1)),
    };

    Some(RouteResult {
        distance_meters: route.distance,
        duration_seconds: route.duration,
        geometry: route.geometry.clone().unwrap_or_default(),
        start_coordinate,
        end_coordinate,
    })
}

/// Convert along-route POIs, preserving provider order.
///
/// POIs without a distance into the route cannot be placed on it and are
/// skipped. A response with no POI list yields an empty list.
pub fn convert_pois(response: &AlongRouteResponse) -> Vec<PoiRecord> {
    response
        .suggested_pois
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(convert_poi)
        .collect()
}

fn convert_poi(poi: &SuggestedPoi) -> Option<PoiRecord> {
    let distance_meters = poi.distance.filter(|d| d.is_finite())?;

    let coordinate = match (poi.latitude, poi.longitude) {
        (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
        _ => None,
    };

    Some(PoiRecord {
        name: non_empty(&poi.poi),
        popular_name: non_empty(&poi.poplr_name),
        category: non_empty(&poi.category),
        address: non_empty(&poi.address),
        distance_meters,
        coordinate,
    })
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}
