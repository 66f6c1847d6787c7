//! `fd-core`: foundational types for the `rust_fleet` dispatch workspace.
//!
//! This crate is a dependency of every other `fd-*` crate.  It intentionally
//! has no `fd-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `DriverId`, `RestaurantId`                                |
//! | [`geo`]     | `GeoPoint`, haversine distance, point-to-segment distance |
//! | [`entity`]  | `Driver`, `Restaurant` snapshots                          |
//! | [`config`]  | `FleetConfig`                                             |
//! | [`rng`]     | `SimRng`                                                  |
//! | [`error`]   | `FdError`, `FdResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod entity;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::FleetConfig;
pub use entity::{Driver, Restaurant};
pub use error::{FdError, FdResult};
pub use geo::{GeoPoint, EARTH_RADIUS_KM, haversine_km, point_segment_distance_deg};
pub use ids::{DriverId, RestaurantId};
pub use rng::SimRng;
