//! Domain types for route cost estimation.
//!
//! These are provider-agnostic: the Mappls wire format is converted into
//! them at the client boundary.

mod error;
mod location;
mod poi;
mod route;

pub use error::{AuthError, EstimateError, InputError};
pub use location::{Coordinate, CoordinateString, Endpoint};
pub use poi::PoiRecord;
pub use route::RouteResult;
