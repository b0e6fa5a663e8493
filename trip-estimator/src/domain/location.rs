//! Location types: coordinates, route endpoints and the provider's
//! coordinate string.

use std::fmt;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build a coordinate from a provider `[lng, lat]` pair.
    ///
    /// Returns `None` unless the slice holds at least two finite values.
    pub fn from_lng_lat(pair: &[f64]) -> Option<Self> {
        match pair {
            [lng, lat, ..] if lng.is_finite() && lat.is_finite() => Some(Self::new(*lat, *lng)),
            _ => None,
        }
    }

    /// Render in the provider's wire order: longitude first.
    pub fn to_lng_lat(&self) -> String {
        format!("{},{}", self.lng, self.lat)
    }
}

/// One end of a planned route.
///
/// An endpoint may carry a provider place-code (eLoc), a coordinate, or
/// both. When both are present the place-code wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Endpoint {
    pub place_code: Option<String>,
    pub coordinate: Option<Coordinate>,
}

impl Endpoint {
    /// An endpoint identified by a provider place-code.
    pub fn place(code: impl Into<String>) -> Self {
        Self {
            place_code: Some(code.into()),
            coordinate: None,
        }
    }

    /// An endpoint identified by raw coordinates.
    pub fn at(lat: f64, lng: f64) -> Self {
        Self {
            place_code: None,
            coordinate: Some(Coordinate::new(lat, lng)),
        }
    }

    /// Attach a coordinate to this endpoint.
    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    /// The place-code, if one is present and non-blank.
    pub fn usable_place_code(&self) -> Option<&str> {
        self.place_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    /// The coordinate, if both components are finite.
    pub fn usable_coordinate(&self) -> Option<Coordinate> {
        self.coordinate
            .filter(|c| c.lat.is_finite() && c.lng.is_finite())
    }
}

/// Locations joined into the form the routing endpoint accepts in its
/// path, e.g. `"2KK6DX;2UQY8X"` or `"77.209,28.6139;77.0697,28.4595"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoordinateString(String);

impl CoordinateString {
    pub(crate) fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CoordinateString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
