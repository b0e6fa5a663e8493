//! Itemised trip cost.
//!
//! Currency amounts are whole units. Fuel quantity keeps one decimal.

use crate::domain::RouteResult;

use super::config::EstimatorConfig;
use super::tolls::TollResult;
use super::vehicles::VehicleProfile;

#[derive(Debug, Clone, PartialEq)]
pub struct FuelCost {
    /// Litres, one decimal place.
    pub units: f64,
    pub unit_price: f64,
    pub total_cost: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriverCost {
    /// Daily allowance, paid per started block of driving hours.
    pub allowance: u64,
    pub driving_pay: u64,
    pub total_cost: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceCost {
    pub rate_per_km: u32,
    pub total_cost: u64,
}

/// A priced breakdown for one trip.
#[derive(Debug, Clone, PartialEq)]
pub struct CostEstimate {
    pub fuel: FuelCost,
    pub tolls: TollResult,
    pub driver: DriverCost,
    pub maintenance: MaintenanceCost,
    /// Sum of the four component totals.
    pub total_estimate: u64,
}

/// Combine route, vehicle and toll data into a cost estimate.
///
/// A fuel price that is zero, negative or not a number yields a zero fuel
/// cost; the litres are still reported.
pub fn compose(
    route: &RouteResult,
    vehicle: &VehicleProfile,
    tolls: TollResult,
    fuel_price_per_unit: f64,
    config: &EstimatorConfig,
) -> CostEstimate {
    let distance_km = route.distance_km();
    let hours = route.duration_hours();

    let units = round1(distance_km / vehicle.fuel_efficiency);
    let unit_price = if fuel_price_per_unit.is_finite() {
        fuel_price_per_unit
    } else {
        0.0
    };
    let fuel_cost = if unit_price > 0.0 {
        round_currency(units * unit_price)
    } else {
        0
    };

    let blocks = (hours / config.driver_block_hours).ceil();
    let allowance = round_currency(blocks) * config.driver_allowance_per_block;
    let driving_pay = round_currency(hours * config.driver_pay_per_hour);

    let maintenance_cost =
        round_currency(distance_km * f64::from(config.maintenance_rate_per_km));

    let total_estimate = fuel_cost + tolls.total_cost + allowance + driving_pay + maintenance_cost;

    CostEstimate {
        fuel: FuelCost {
            units,
            unit_price,
            total_cost: fuel_cost,
        },
        tolls,
        driver: DriverCost {
            allowance,
            driving_pay,
            total_cost: allowance + driving_pay,
        },
        maintenance: MaintenanceCost {
            rate_per_km: config.maintenance_rate_per_km,
            total_cost: maintenance_cost,
        },
        total_estimate,
    }
}

/// Round to one decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to a whole currency unit. Negative and non-finite values become 0.
fn round_currency(value: f64) -> u64 {
    let rounded = value.round();
    if rounded.is_finite() && rounded > 0.0 {
        rounded as u64
    } else {
        0
    }
}
