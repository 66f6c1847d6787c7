//! `fd-dispatch`: assigning drivers to restaurants.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`distributor`] | `Distributor` trait, `Assignment`, `DistributorKind`    |
//! | [`greedy`]      | `GreedyDistributor`: one pass in input order           |
//! | [`sorted_cost`] | `SortedCostDistributor`: constrained drivers first     |
//! | [`matrix`]      | `CostMatrix`: driver × restaurant haversine distances  |
//! | [`store`]       | `FleetStore` trait, `MemoryFleetStore`, `run_distribution` |
//! | [`sqlite`]      | `SqliteFleetStore` (feature = `"sqlite"` only)          |
//! | [`fleet`]       | Random driver spawning and order refresh                |
//! | [`loader`]      | Restaurant seed file loader                             |
//! | [`error`]       | `DispatchError`, `DispatchResult`                       |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Builds cost matrix rows on Rayon's pool.               |
//! | `sqlite`   | Enables the SQLite `FleetStore` backend.               |

pub mod distributor;
pub mod error;
pub mod fleet;
pub mod greedy;
pub mod loader;
pub mod matrix;
pub mod sorted_cost;
pub mod store;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use distributor::{Assignment, Distributor, DistributorKind};
pub use error::{DispatchError, DispatchResult};
pub use fleet::{refresh_orders, spawn_drivers};
pub use greedy::GreedyDistributor;
pub use loader::{load_restaurants_file, load_restaurants_json};
pub use matrix::CostMatrix;
pub use sorted_cost::SortedCostDistributor;
pub use store::{FleetStore, MemoryFleetStore, run_distribution};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteFleetStore;
