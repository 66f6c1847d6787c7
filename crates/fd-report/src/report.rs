//! Report rows and the pure generator.

use std::collections::HashMap;

use log::warn;
use serde::{Serialize, Serializer};

use fd_core::{Driver, GeoPoint, Restaurant, RestaurantId, haversine_km};

/// Placeholder title for "no restaurant".
pub const NONE_TITLE: &str = "none";

/// Orders before versus after the run for one restaurant.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RestaurantRow {
    pub restaurant_id: u32,
    pub title:         String,
    pub orders_before: u32,
    /// `max(orders_count − assigned capacity, 0)`.
    pub orders_after:  u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl From<GeoPoint> for Position {
    fn from(p: GeoPoint) -> Self {
        Self { lat: p.lat, lng: p.lng }
    }
}

/// One placed driver.  Distances are kilometres rounded to 2 decimals.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DriverRow {
    pub id:                   u32,
    pub name:                 String,
    pub position:             Position,
    /// Title of the assigned restaurant; serialised as `"none"` when absent.
    #[serde(serialize_with = "title_or_none")]
    pub assigned_restaurant:  Option<String>,
    pub assigned_distance_km: f64,
    /// Closest restaurant regardless of assignment; `"none"` when there are
    /// no restaurants.
    #[serde(serialize_with = "title_or_none")]
    pub nearest_restaurant:   Option<String>,
    pub nearest_distance_km:  f64,
}

/// The full post-distribution report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FleetReport {
    pub restaurants:         Vec<RestaurantRow>,
    pub drivers:             Vec<DriverRow>,
    /// Mean assigned distance over the driver rows (unassigned count as 0).
    pub average_distance_km: f64,
}

impl FleetReport {
    /// Driver rows without an assigned restaurant.
    pub fn unassigned_count(&self) -> usize {
        self.drivers.iter().filter(|d| d.assigned_restaurant.is_none()).count()
    }

    /// Sum of `orders_after` over all restaurants.
    pub fn remaining_orders(&self) -> u64 {
        self.restaurants.iter().map(|r| u64::from(r.orders_after)).sum()
    }
}

fn title_or_none<S: Serializer>(title: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(title.as_deref().unwrap_or(NONE_TITLE))
}

/// `orders_count` per restaurant, to pass as `orders_before` after the run.
pub fn orders_snapshot(restaurants: &[Restaurant]) -> HashMap<RestaurantId, u32> {
    restaurants.iter().map(|r| (r.id, r.orders_count)).collect()
}

/// Round to 2 decimals, halves away from zero.
#[inline]
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Build the report for a post-assignment snapshot.
///
/// - Restaurants keep input order.  `orders_before` comes from
///   `orders_before` (0 when missing); `orders_after` subtracts the capacity
///   of every driver assigned to the restaurant, clamped at 0.
/// - Drivers are listed by ID.  Drivers without a position are left out and
///   do not count toward the average.
/// - An assignment to a restaurant not in `restaurants` is reported as
///   unassigned.
pub fn generate_report(
    drivers:       &[Driver],
    restaurants:   &[Restaurant],
    orders_before: &HashMap<RestaurantId, u32>,
) -> FleetReport {
    let mut assigned_capacity: HashMap<RestaurantId, u64> = HashMap::new();
    for d in drivers {
        if let Some(r) = d.restaurant {
            *assigned_capacity.entry(r).or_default() += u64::from(d.capacity);
        }
    }

    let restaurant_rows = restaurants
        .iter()
        .map(|r| {
            let assigned = assigned_capacity.get(&r.id).copied().unwrap_or(0);
            RestaurantRow {
                restaurant_id: r.id.get(),
                title:         r.title.clone(),
                orders_before: orders_before.get(&r.id).copied().unwrap_or(0),
                orders_after:  u64::from(r.orders_count).saturating_sub(assigned) as u32,
            }
        })
        .collect();

    let by_id: HashMap<RestaurantId, &Restaurant> = restaurants.iter().map(|r| (r.id, r)).collect();

    let mut ordered: Vec<&Driver> = drivers.iter().collect();
    ordered.sort_by_key(|d| d.id);

    let mut driver_rows = Vec::with_capacity(ordered.len());
    let mut total_distance = 0.0;

    for d in ordered {
        let Some(position) = d.position else {
            continue;
        };

        let assigned = d.restaurant.and_then(|id| {
            let found = by_id.get(&id).copied();
            if found.is_none() {
                warn!("{} is assigned to unknown {id}; reporting as unassigned", d.id);
            }
            found
        });
        let assigned_distance = assigned.map_or(0.0, |r| haversine_km(position, r.position));

        let nearest = restaurants
            .iter()
            .map(|r| (r, haversine_km(position, r.position)))
            .fold(None, |best: Option<(&Restaurant, f64)>, (r, dist)| match best {
                Some((_, b)) if b <= dist => best,
                _ => Some((r, dist)),
            });

        total_distance += assigned_distance;
        driver_rows.push(DriverRow {
            id:                   d.id.get(),
            name:                 d.name.clone(),
            position:             position.into(),
            assigned_restaurant:  assigned.map(|r| r.title.clone()),
            assigned_distance_km: round2(assigned_distance),
            nearest_restaurant:   nearest.map(|(r, _)| r.title.clone()),
            nearest_distance_km:  nearest.map_or(0.0, |(_, dist)| round2(dist)),
        });
    }

    let average = if driver_rows.is_empty() {
        0.0
    } else {
        total_distance / driver_rows.len() as f64
    };

    FleetReport {
        restaurants:         restaurant_rows,
        drivers:             driver_rows,
        average_distance_km: round2(average),
    }
}
