use thiserror::Error;

use fd_core::{DriverId, RestaurantId};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("assignment references unknown driver {0}")]
    UnknownDriver(DriverId),

    #[error("assignment references unknown restaurant {0}")]
    UnknownRestaurant(RestaurantId),

    #[error("restaurant data parse error: {0}")]
    Parse(String),

    #[error("fleet store unavailable: {0}")]
    Store(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
