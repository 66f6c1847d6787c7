//! Random fleet generation.

use log::{debug, info};

use fd_core::{Driver, DriverId, FleetConfig, Restaurant, RestaurantId, SimRng};
use fd_roads::PositionSampler;

/// Upper bound (inclusive) for refreshed order counts.
pub const MAX_REFRESH_ORDERS: u32 = 50;

const FIRST_NAMES: &[&str] = &[
    "Ivan", "Maria", "Georgi", "Elena", "Dimitar", "Nikoleta", "Petar", "Yana",
    "Stefan", "Desislava", "Kaloyan", "Radostina", "Boris", "Viktoria", "Todor", "Mila",
];

const LAST_NAMES: &[&str] = &[
    "Petrov", "Ivanova", "Georgiev", "Dimitrova", "Nikolov", "Stoyanova",
    "Todorov", "Hristova", "Angelov", "Kostadinova", "Marinov", "Popova",
];

/// Create `cfg.driver_count` unassigned drivers with IDs `1..=driver_count`.
///
/// Each driver is placed near a uniformly chosen restaurant by asking
/// `sampler` for a point within `cfg.placement_radius_km`, picking a new
/// restaurant on every attempt.  A driver whose `cfg.placement_attempts`
/// attempts all come back empty (or who has no restaurant to start from) is
/// created without a position.
pub fn spawn_drivers(
    cfg:         &FleetConfig,
    restaurants: &[Restaurant],
    sampler:     &dyn PositionSampler,
    rng:         &mut SimRng,
) -> Vec<Driver> {
    let mut unplaced = 0usize;

    let drivers: Vec<Driver> = (1..=cfg.driver_count)
        .map(|n| {
            let name = random_name(rng);
            let capacity = rng.gen_range(cfg.min_capacity..=cfg.max_capacity);

            let position = (0..cfg.placement_attempts).find_map(|_| {
                let origin = rng.choose(restaurants)?.position;
                sampler.random_point_near(origin, cfg.placement_radius_km, rng)
            });
            if position.is_none() {
                unplaced += 1;
                debug!("DriverId({n}) could not be placed after {} attempts", cfg.placement_attempts);
            }

            Driver { id: DriverId(n), name, position, capacity, restaurant: None }
        })
        .collect();

    info!(
        "Spawned {} drivers around {} restaurants ({} unplaced)",
        drivers.len(),
        restaurants.len(),
        unplaced
    );
    drivers
}

/// Draw a fresh `orders_count` in `1..=MAX_REFRESH_ORDERS` for every
/// restaurant.  Returns the updates in input order for
/// [`FleetStore::set_orders`](crate::FleetStore::set_orders).
pub fn refresh_orders(restaurants: &[Restaurant], rng: &mut SimRng) -> Vec<(RestaurantId, u32)> {
    restaurants
        .iter()
        .map(|r| (r.id, rng.gen_range(1..=MAX_REFRESH_ORDERS)))
        .collect()
}

fn random_name(rng: &mut SimRng) -> String {
    let first = rng.choose(FIRST_NAMES).copied().unwrap_or("Driver");
    let last = rng.choose(LAST_NAMES).copied().unwrap_or_default();
    format!("{first} {last}")
}
