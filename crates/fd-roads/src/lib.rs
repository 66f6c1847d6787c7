//! `fd-roads`: road segment tiles, spatial cache, and on-road sampling.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`tile`]     | `TileKey`, `RoadSegment`, grid constants                  |
//! | [`decoder`]  | `SegmentStream`: lazy polyline → `(TileKey, segment)`    |
//! | [`codec`]    | Binary tile value encoding                                |
//! | [`cache`]    | `TileCache` trait, `MemoryTileCache`                      |
//! | [`sqlite`]   | `SqliteTileCache` (feature = `"sqlite"` only)             |
//! | [`indexer`]  | `TileIndexer`: full-snapshot preload into a cache        |
//! | [`sampler`]  | `RoadSampler`: random point on a road near a location   |
//! | [`position`] | `PositionSampler` trait and strategy selection            |
//! | [`error`]    | `RoadsError`, `CacheError`, result aliases                |
//!
//! # Feature flags
//!
//! | Flag     | Effect                                                     |
//! |----------|------------------------------------------------------------|
//! | `sqlite` | Enables the SQLite `TileCache` backend via `rusqlite`.     |
//! | `serde`  | Propagates serde derives to `fd-core` types.               |

pub mod cache;
pub mod codec;
pub mod decoder;
pub mod error;
pub mod indexer;
pub mod position;
pub mod sampler;
pub mod tile;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use cache::{MemoryTileCache, TileCache};
pub use codec::{decode_segments, encode_segments};
pub use decoder::SegmentStream;
pub use error::{CacheError, CacheResult, RoadsError, RoadsResult};
pub use indexer::{IndexerConfig, PRELOAD_FLAG, PreloadStats, TileIndexer};
pub use position::{PositionSampler, PositionStrategy, RandomOffsetSampler};
pub use sampler::{RadiusUnit, RoadSampler, SamplerConfig};
pub use tile::{RoadSegment, TILE_PREFIX, TILE_SIZE_DEG, TileKey};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteTileCache;
