//! Fleet generation configuration.

use crate::{FdError, FdResult};

/// Parameters for populating a fleet of drivers around the restaurants.
///
/// Typically built by the application from CLI flags and passed by value to
/// the fleet generator.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleetConfig {
    /// Master RNG seed.  The same seed always produces the same fleet.
    pub seed: u64,

    /// Number of drivers to create per refresh.  Doubles as the highest
    /// `DriverId`.  Default: 100.
    pub driver_count: u32,

    /// Radius passed to the position sampler around a restaurant.
    /// Default: 5.0.
    pub placement_radius_km: f64,

    /// How many sampler calls to make before leaving a driver unplaced.
    pub placement_attempts: u32,

    /// Inclusive capacity range drawn uniformly per driver.  Default: 1..=4.
    pub min_capacity: u32,
    pub max_capacity: u32,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            seed:                42,
            driver_count:        100,
            placement_radius_km: 5.0,
            placement_attempts:  8,
            min_capacity:        1,
            max_capacity:        4,
        }
    }
}

impl FleetConfig {
    /// Reject configurations the generator cannot honour.
    pub fn validate(&self) -> FdResult<()> {
        if self.min_capacity == 0 {
            return Err(FdError::Config("min_capacity must be positive".into()));
        }
        if self.min_capacity > self.max_capacity {
            return Err(FdError::Config(format!(
                "capacity range {}..={} is empty",
                self.min_capacity, self.max_capacity
            )));
        }
        if !(self.placement_radius_km.is_finite() && self.placement_radius_km > 0.0) {
            return Err(FdError::Config(format!(
                "placement radius must be a positive number, got {}",
                self.placement_radius_km
            )));
        }
        if self.placement_attempts == 0 {
            return Err(FdError::Config("placement_attempts must be at least 1".into()));
        }
        Ok(())
    }
}
