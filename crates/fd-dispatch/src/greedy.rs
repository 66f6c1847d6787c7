//! Single-pass greedy distributor.
//!
//! Drivers are visited in input order.  Each one goes to the restaurant with
//! the lowest
//!
//! ```text
//! score = distance_km · distance_weight
//!       + max(target − (remaining − capacity), 0) · balance_weight
//! ```
//!
//! among restaurants with `remaining > 0`; the first minimum wins.
//! `remaining` starts at each restaurant's `orders_count` and is decremented
//! by the driver's capacity, so it can go negative; the report clamps it.
//! Every placed driver is considered, and any previous assignment is
//! replaced.

use log::debug;

use fd_core::{Driver, Restaurant, haversine_km};

use crate::distributor::{Assignment, Distributor, placed, target_remaining};

#[derive(Clone, Debug)]
pub struct GreedyDistributor {
    /// Default: 1.0.
    pub distance_weight: f64,
    /// Default: 5.0.
    pub balance_weight:  f64,
}

impl Default for GreedyDistributor {
    fn default() -> Self {
        Self { distance_weight: 1.0, balance_weight: 5.0 }
    }
}

impl Distributor for GreedyDistributor {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn distribute(&self, drivers: &[Driver], restaurants: &[Restaurant]) -> Assignment {
        let mut assignment = Assignment::new();
        if drivers.is_empty() || restaurants.is_empty() {
            return assignment;
        }

        let drivers = placed(drivers.iter(), self.name());
        let target = target_remaining(drivers.iter().map(|(d, _)| d.capacity), restaurants);
        let mut remaining: Vec<i64> =
            restaurants.iter().map(|r| i64::from(r.orders_count)).collect();

        for (driver, position) in drivers {
            let capacity = i64::from(driver.capacity);
            let mut best: Option<(usize, f64)> = None;

            for (j, restaurant) in restaurants.iter().enumerate() {
                if remaining[j] <= 0 {
                    continue;
                }
                let distance = haversine_km(position, restaurant.position);
                let after = (remaining[j] - capacity) as f64;
                let penalty = (target - after).max(0.0);
                let score = distance * self.distance_weight + penalty * self.balance_weight;

                if best.is_none_or(|(_, s)| score < s) {
                    best = Some((j, score));
                }
            }

            match best {
                Some((j, _)) => {
                    assignment.insert(driver.id, restaurants[j].id);
                    remaining[j] -= capacity;
                }
                None => debug!("greedy: no restaurant with remaining orders for {}", driver.id),
            }
        }

        assignment
    }
}
