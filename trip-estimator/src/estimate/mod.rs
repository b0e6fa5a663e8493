//! Trip cost estimation.
//!
//! Turns a pair of endpoints and a vehicle class into a route and an
//! itemised cost:
//! 1. Resolve endpoints into a provider coordinate string
//! 2. Fetch the primary route
//! 3. Count toll plazas along it, live or by distance heuristic
//! 4. Price fuel, tolls, driver and maintenance

mod config;
mod cost;
mod engine;
mod resolve;
mod tolls;
mod vehicles;

pub use config::EstimatorConfig;
pub use cost::{CostEstimate, DriverCost, FuelCost, MaintenanceCost, compose};
pub use engine::{Estimate, Estimator, RouteProvider, RouteQuery, TollProvider};
pub use resolve::resolve;
pub use tolls::{
    TollCandidate, TollResult, TollSource, dedup_candidates, estimate_tolls, heuristic_count,
    is_toll_booth, rate_for_axles, reconcile,
};
pub use vehicles::{DEFAULT_VEHICLE_CLASS, VEHICLE_PROFILES, VehicleProfile, lookup};
