//! Constrained-first distributor over a precomputed cost matrix.
//!
//! Only drivers without a restaurant take part.  Drivers are ordered by their
//! distance to the *closest* restaurant, smallest first (stable on ties), so
//! drivers that are near to something are served before drivers that are far
//! from everything.  Each driver then scans restaurants nearest-first,
//! skipping any whose accumulated load has reached its `orders_count`, and
//! takes the lowest
//!
//! ```text
//! score = distance_km · distance_weight
//!       + max(target − (orders − (load + capacity)), 0)^penalty_exponent · balance_weight
//! ```
//!
//! A restaurant with spare room can still receive a driver whose capacity
//! pushes its load past `orders_count`; after that it is skipped.

use log::debug;

use fd_core::{Driver, GeoPoint, Restaurant};

use crate::distributor::{Assignment, Distributor, placed, target_remaining};
use crate::matrix::CostMatrix;

#[derive(Clone, Debug)]
pub struct SortedCostDistributor {
    /// Default: 0.7.
    pub distance_weight:  f64,
    /// Default: 10.0.
    pub balance_weight:   f64,
    /// Default: 1.3.
    pub penalty_exponent: f64,
}

impl Default for SortedCostDistributor {
    fn default() -> Self {
        Self {
            distance_weight:  0.7,
            balance_weight:   10.0,
            penalty_exponent: 1.3,
        }
    }
}

impl Distributor for SortedCostDistributor {
    fn name(&self) -> &'static str {
        "sorted-cost"
    }

    fn distribute(&self, drivers: &[Driver], restaurants: &[Restaurant]) -> Assignment {
        let mut assignment = Assignment::new();

        let drivers = placed(drivers.iter().filter(|d| !d.is_assigned()), self.name());
        if drivers.is_empty() || restaurants.is_empty() {
            return assignment;
        }

        let target = target_remaining(drivers.iter().map(|(d, _)| d.capacity), restaurants);

        let origins: Vec<GeoPoint> = drivers.iter().map(|&(_, p)| p).collect();
        let sites: Vec<GeoPoint> = restaurants.iter().map(|r| r.position).collect();
        let costs = CostMatrix::build(&origins, &sites);

        let mut order: Vec<usize> = (0..costs.rows()).collect();
        order.sort_by(|&a, &b| costs.row_min(a).total_cmp(&costs.row_min(b)));

        let mut load: Vec<u64> = vec![0; restaurants.len()];

        for i in order {
            let (driver, _) = drivers[i];
            let capacity = u64::from(driver.capacity);
            let distances = costs.row(i);

            let mut by_distance: Vec<usize> = (0..costs.cols()).collect();
            by_distance.sort_by(|&a, &b| distances[a].total_cmp(&distances[b]));

            let mut best: Option<(usize, f64)> = None;
            for j in by_distance {
                let orders = u64::from(restaurants[j].orders_count);
                if load[j] >= orders {
                    continue;
                }
                let after = orders as f64 - (load[j] + capacity) as f64;
                let penalty = (target - after).max(0.0).powf(self.penalty_exponent);
                let score = distances[j] * self.distance_weight + penalty * self.balance_weight;

                if best.is_none_or(|(_, s)| score < s) {
                    best = Some((j, score));
                }
            }

            match best {
                Some((j, _)) => {
                    assignment.insert(driver.id, restaurants[j].id);
                    load[j] += capacity;
                }
                None => debug!("sorted-cost: every restaurant is full for {}", driver.id),
            }
        }

        assignment
    }
}
