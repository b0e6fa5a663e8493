//! Coefficients for cost estimation.

use std::time::Duration;

/// Configuration parameters for cost estimation.
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// Lateral search width around the route for toll POIs (meters).
    pub toll_buffer_meters: u32,

    /// POIs closer than this along the route are the same plaza (meters).
    pub toll_dedup_window_meters: f64,

    /// Assumed spacing between plazas when live toll data is unavailable (km).
    pub heuristic_toll_spacing_km: f64,

    /// Driver allowance paid per started block of driving.
    pub driver_allowance_per_block: u64,

    /// Length of one allowance block (hours).
    pub driver_block_hours: f64,

    /// Driver pay per hour of driving.
    pub driver_pay_per_hour: f64,

    /// Maintenance cost per kilometer.
    pub maintenance_rate_per_km: u32,

    /// Deadline for each outbound provider call.
    pub call_timeout: Duration,
}

impl EstimatorConfig {
    /// Set the deadline for each outbound provider call.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            toll_buffer_meters: 200,
            toll_dedup_window_meters: 500.0,
            heuristic_toll_spacing_km: 60.0,
            driver_allowance_per_block: 500,
            driver_block_hours: 10.0,
            driver_pay_per_hour: 50.0,
            maintenance_rate_per_km: 2,
            call_timeout: Duration::from_secs(10),
        }
    }
}
