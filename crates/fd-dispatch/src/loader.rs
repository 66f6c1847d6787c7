//! Restaurant seed file loader.
//!
//! # Format
//!
//! A JSON array of objects with a title and `[lat, lng]` coordinates:
//!
//! ```json
//! [
//!   { "title": "Happy Bar & Grill", "coordinates": [42.6886, 23.308027] },
//!   { "title": "Skaptobara",        "coordinates": [42.6951, 23.3219] }
//! ]
//! ```
//!
//! Restaurants receive sequential IDs starting at 1 in file order and a
//! random `orders_count` in `5..=50`.  Unknown fields are ignored.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;
use serde::Deserialize;

use fd_core::{GeoPoint, Restaurant, RestaurantId, SimRng};

use crate::{DispatchError, DispatchResult};

/// Range of the initial `orders_count` drawn per seeded restaurant.
pub const SEED_ORDERS: std::ops::RangeInclusive<u32> = 5..=50;

#[derive(Deserialize)]
struct RestaurantRecord {
    title:       String,
    coordinates: [f64; 2],
}

/// Load restaurants from the JSON file at `path`.
pub fn load_restaurants_file(path: &Path, rng: &mut SimRng) -> DispatchResult<Vec<Restaurant>> {
    let file = File::open(path)?;
    let restaurants = load_restaurants_json(BufReader::new(file), rng)?;
    info!("Loaded {} restaurants from {}", restaurants.len(), path.display());
    Ok(restaurants)
}

/// Like [`load_restaurants_file`] but accepts any `Read` source.
pub fn load_restaurants_json<R: Read>(reader: R, rng: &mut SimRng) -> DispatchResult<Vec<Restaurant>> {
    let records: Vec<RestaurantRecord> = serde_json::from_reader(reader).map_err(|e| {
        if e.is_io() {
            DispatchError::Io(e.into())
        } else {
            DispatchError::Parse(e.to_string())
        }
    })?;

    let restaurants = records
        .into_iter()
        .enumerate()
        .map(|(i, rec)| {
            let [lat, lng] = rec.coordinates;
            let orders = rng.gen_range(SEED_ORDERS);
            Restaurant::new(RestaurantId(i as u32 + 1), rec.title, GeoPoint::new(lat, lng), orders)
        })
        .collect();
    Ok(restaurants)
}
