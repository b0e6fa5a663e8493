//! The primary route returned by the routing provider.

use super::Coordinate;

/// Distance, duration and geometry of the primary route.
///
/// Start and end coordinates are advisory (used for map display) and may be
/// absent when the provider omits maneuver data.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// Encoded polyline, passed through untouched.
    pub geometry: String,
    pub start_coordinate: Option<Coordinate>,
    pub end_coordinate: Option<Coordinate>,
}

impl RouteResult {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_seconds / 3600.0
    }

    /// Human-readable distance, e.g. `"120.0 km"` or `"850 m"`.
    pub fn distance_text(&self) -> String {
        let km = self.distance_km();
        if km >= 1.0 {
            format!("{km:.1} km")
        } else {
            format!("{} m", self.distance_meters)
        }
    }

    /// Human-readable duration, e.g. `"2h 30 m"` or `"45 min"`.
    pub fn duration_text(&self) -> String {
        let hours = self.duration_hours();
        if hours >= 1.0 {
            let minutes = ((hours % 1.0) * 60.0).round();
            format!("{}h {} m", hours.floor(), minutes)
        } else {
            format!("{} min", (self.duration_seconds / 60.0).round())
        }
    }
}
