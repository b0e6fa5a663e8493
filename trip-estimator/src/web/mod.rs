//! Web layer for the trip cost estimator.
//!
//! Provides HTTP endpoints for route cost estimates and place lookup.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
