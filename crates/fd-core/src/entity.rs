//! Snapshots of the externally persisted entities.
//!
//! The dispatch core never owns these rows; it reads a snapshot, computes an
//! assignment, and hands the result back to the store.

use crate::{DriverId, GeoPoint, RestaurantId};

/// A delivery driver.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Driver {
    pub id:         DriverId,
    pub name:       String,
    /// Current location.  `None` when the driver could not be placed; such
    /// drivers are ignored by distributors and by the report.
    pub position:   Option<GeoPoint>,
    /// Orders the driver can carry.  Always positive.
    pub capacity:   u32,
    pub restaurant: Option<RestaurantId>,
}

impl Driver {
    pub fn new(id: DriverId, name: impl Into<String>, position: GeoPoint, capacity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            position: Some(position),
            capacity,
            restaurant: None,
        }
    }

    #[inline]
    pub fn is_assigned(&self) -> bool {
        self.restaurant.is_some()
    }
}

/// A restaurant with a queue of pending orders.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Restaurant {
    pub id:           RestaurantId,
    pub title:        String,
    pub position:     GeoPoint,
    pub orders_count: u32,
}

impl Restaurant {
    pub fn new(id: RestaurantId, title: impl Into<String>, position: GeoPoint, orders_count: u32) -> Self {
        Self { id, title: title.into(), position, orders_count }
    }
}
