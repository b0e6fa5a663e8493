//! Points of interest found along a route.

use super::Coordinate;

/// A point of interest reported by the along-route search.
///
/// Mirrors what the provider tells us, before any toll filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiRecord {
    /// Primary label (e.g. "Kherki Daula Toll Plaza").
    pub name: Option<String>,
    /// Popular name, used when the primary label is missing.
    pub popular_name: Option<String>,
    /// Provider category code (e.g. "TOLBRD").
    pub category: Option<String>,
    pub address: Option<String>,
    /// Distance from the route start to this POI, in meters.
    pub distance_meters: f64,
    pub coordinate: Option<Coordinate>,
}

impl PoiRecord {
    /// A record with only a label, category and distance set.
    pub fn new(name: Option<&str>, category: Option<&str>, distance_meters: f64) -> Self {
        Self {
            name: name.map(str::to_string),
            popular_name: None,
            category: category.map(str::to_string),
            address: None,
            distance_meters,
            coordinate: None,
        }
    }
}
