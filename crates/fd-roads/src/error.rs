//! Road-subsystem error types.

use thiserror::Error;

/// Failures talking to a [`TileCache`](crate::TileCache) backend.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Errors produced by `fd-roads`.
#[derive(Debug, Error)]
pub enum RoadsError {
    /// The polyline dataset is not an array of `[lng, lat]` pair arrays.
    #[error("dataset format error: {0}")]
    DatasetFormat(String),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("tile codec error: {0}")]
    Codec(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RoadsResult<T> = Result<T, RoadsError>;
