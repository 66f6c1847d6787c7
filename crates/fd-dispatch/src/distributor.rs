//! The `Distributor` trait: the extension point for assignment strategies.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::warn;

use fd_core::{Driver, DriverId, GeoPoint, Restaurant, RestaurantId};

use crate::greedy::GreedyDistributor;
use crate::sorted_cost::SortedCostDistributor;

/// New restaurant per driver produced by one distribution run.
///
/// Drivers absent from the map keep whatever assignment they had.  Ordered by
/// driver ID so commits and logs are deterministic.
pub type Assignment = BTreeMap<DriverId, RestaurantId>;

/// Pluggable driver → restaurant assignment.
///
/// Implementations are pure: they read immutable snapshots and return a new
/// [`Assignment`] without touching any store.  Committing the result is the
/// caller's job (see [`run_distribution`](crate::run_distribution)).
///
/// Empty driver or restaurant input yields an empty assignment.  A driver for
/// which no restaurant is feasible is simply left out.
pub trait Distributor: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn distribute(&self, drivers: &[Driver], restaurants: &[Restaurant]) -> Assignment;
}

impl<D: Distributor + ?Sized> Distributor for Box<D> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn distribute(&self, drivers: &[Driver], restaurants: &[Restaurant]) -> Assignment {
        (**self).distribute(drivers, restaurants)
    }
}

/// Orders that would be left over if every participating driver were filled,
/// spread evenly across restaurants.  Both distributors penalise restaurants
/// whose remaining orders would drop below this level.
pub(crate) fn target_remaining(
    capacities:  impl Iterator<Item = u32>,
    restaurants: &[Restaurant],
) -> f64 {
    if restaurants.is_empty() {
        return 0.0;
    }
    let total_orders: u64 = restaurants.iter().map(|r| u64::from(r.orders_count)).sum();
    let total_capacity: u64 = capacities.map(u64::from).sum();
    total_orders.saturating_sub(total_capacity) as f64 / restaurants.len() as f64
}

/// Drivers with a known position, paired with it.  Unplaced drivers are
/// logged and dropped.
pub(crate) fn placed<'a>(
    drivers: impl Iterator<Item = &'a Driver>,
    who:     &str,
) -> Vec<(&'a Driver, GeoPoint)> {
    drivers
        .filter_map(|d| match d.position {
            Some(p) => Some((d, p)),
            None => {
                warn!("{who}: skipping {} without a position", d.id);
                None
            }
        })
        .collect()
}

// ── Strategy selection ────────────────────────────────────────────────────────

/// Which built-in [`Distributor`] to run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DistributorKind {
    #[default]
    Greedy,
    SortedCost,
}

impl DistributorKind {
    /// The distributor with its default weights.
    pub fn build(self) -> Box<dyn Distributor> {
        match self {
            DistributorKind::Greedy => Box::new(GreedyDistributor::default()),
            DistributorKind::SortedCost => Box::new(SortedCostDistributor::default()),
        }
    }
}

impl FromStr for DistributorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "greedy" => Ok(DistributorKind::Greedy),
            "sorted-cost" | "sorted" => Ok(DistributorKind::SortedCost),
            other => Err(format!(
                "unknown distributor {other:?}: expected \"greedy\" or \"sorted-cost\""
            )),
        }
    }
}

impl fmt::Display for DistributorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DistributorKind::Greedy => "greedy",
            DistributorKind::SortedCost => "sorted-cost",
        })
    }
}
