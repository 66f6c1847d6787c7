//! SQLite fleet store backend (feature `sqlite`).
//!
//! Two tables, `restaurants` and `drivers`; a driver's assignment is the
//! nullable `drivers.restaurant_id` column.  Every batch write runs inside a
//! single transaction, so a failed batch leaves no partial update behind.
//! A distribution run reads its snapshot and commits inside one immediate
//! transaction.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};

use fd_core::{Driver, DriverId, GeoPoint, Restaurant, RestaurantId};

use crate::distributor::Assignment;
use crate::store::FleetStore;
use crate::{DispatchError, DispatchResult};

/// A [`FleetStore`] stored in an SQLite database.
pub struct SqliteFleetStore {
    conn: Mutex<Connection>,
}

impl SqliteFleetStore {
    /// Open (or create) the database at `path` and initialise the schema.
    pub fn open(path: &Path) -> DispatchResult<Self> {
        Self::init(Connection::open(path)?)
    }

    pub fn in_memory() -> DispatchResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> DispatchResult<Self> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS restaurants (
                 id           INTEGER PRIMARY KEY,
                 title        TEXT    NOT NULL,
                 lat          REAL    NOT NULL,
                 lng          REAL    NOT NULL,
                 orders_count INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS drivers (
                 id            INTEGER PRIMARY KEY,
                 name          TEXT    NOT NULL,
                 lat           REAL,
                 lng           REAL,
                 capacity      INTEGER NOT NULL,
                 restaurant_id INTEGER REFERENCES restaurants(id)
             );",
        )?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Replace the whole restaurant set.  Drivers keep their rows but lose
    /// their assignments.
    pub fn seed_restaurants(&self, restaurants: &[Restaurant]) -> DispatchResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("UPDATE drivers SET restaurant_id = NULL", [])?;
        tx.execute("DELETE FROM restaurants", [])?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO restaurants (id, title, lat, lng, orders_count) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for r in restaurants {
                stmt.execute(params![
                    r.id.get(),
                    r.title,
                    r.position.lat,
                    r.position.lng,
                    r.orders_count
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn lock(&self) -> DispatchResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| DispatchError::Store("sqlite connection lock poisoned".into()))
    }
}

fn driver_from_row(row: &Row<'_>) -> rusqlite::Result<Driver> {
    let lat: Option<f64> = row.get(2)?;
    let lng: Option<f64> = row.get(3)?;
    let restaurant: Option<u32> = row.get(5)?;
    Ok(Driver {
        id:         DriverId(row.get(0)?),
        name:       row.get(1)?,
        position:   lat.zip(lng).map(|(lat, lng)| GeoPoint::new(lat, lng)),
        capacity:   row.get(4)?,
        restaurant: restaurant.map(RestaurantId),
    })
}

fn restaurant_from_row(row: &Row<'_>) -> rusqlite::Result<Restaurant> {
    Ok(Restaurant {
        id:           RestaurantId(row.get(0)?),
        title:        row.get(1)?,
        position:     GeoPoint::new(row.get(2)?, row.get(3)?),
        orders_count: row.get(4)?,
    })
}

fn load_drivers(conn: &Connection) -> DispatchResult<Vec<Driver>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, lat, lng, capacity, restaurant_id FROM drivers ORDER BY id",
    )?;
    let drivers = stmt
        .query_map([], driver_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(drivers)
}

fn load_restaurants(conn: &Connection) -> DispatchResult<Vec<Restaurant>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, title, lat, lng, orders_count FROM restaurants ORDER BY id",
    )?;
    let restaurants = stmt
        .query_map([], restaurant_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(restaurants)
}

/// Write every entry of `assignment`.  Must run inside a transaction: an
/// error leaves earlier rows written until the caller rolls back.
fn write_assignment(conn: &Connection, assignment: &Assignment) -> DispatchResult<usize> {
    let mut exists = conn.prepare_cached("SELECT 1 FROM restaurants WHERE id = ?1")?;
    let mut update = conn.prepare_cached("UPDATE drivers SET restaurant_id = ?2 WHERE id = ?1")?;

    for (&driver, &restaurant) in assignment {
        let known: Option<i64> = exists
            .query_row([restaurant.get()], |row| row.get(0))
            .optional()?;
        if known.is_none() {
            return Err(DispatchError::UnknownRestaurant(restaurant));
        }
        if update.execute(params![driver.get(), restaurant.get()])? == 0 {
            return Err(DispatchError::UnknownDriver(driver));
        }
    }
    Ok(assignment.len())
}

impl FleetStore for SqliteFleetStore {
    fn drivers(&self) -> DispatchResult<Vec<Driver>> {
        load_drivers(&self.lock()?)
    }

    fn restaurants(&self) -> DispatchResult<Vec<Restaurant>> {
        load_restaurants(&self.lock()?)
    }

    fn apply_assignment(&self, assignment: &Assignment) -> DispatchResult<usize> {
        let mut conn = self.lock()?;
        // Dropping `tx` without commit rolls back on any early return.
        let tx = conn.transaction()?;
        let applied = write_assignment(&tx, assignment)?;
        tx.commit()?;
        Ok(applied)
    }

    fn distribute_and_commit(
        &self,
        distribute: &mut dyn FnMut(&[Driver], &[Restaurant]) -> Assignment,
    ) -> DispatchResult<Assignment> {
        let mut conn = self.lock()?;
        // Immediate: take the database write lock before reading the snapshot.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let drivers = load_drivers(&tx)?;
        let restaurants = load_restaurants(&tx)?;
        let assignment = distribute(drivers.as_slice(), restaurants.as_slice());
        write_assignment(&tx, &assignment)?;
        tx.commit()?;
        Ok(assignment)
    }

    fn place_drivers(&self, drivers: Vec<Driver>) -> DispatchResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM drivers", [])?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO drivers (id, name, lat, lng, capacity, restaurant_id) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for d in &drivers {
                stmt.execute(params![
                    d.id.get(),
                    d.name,
                    d.position.map(|p| p.lat),
                    d.position.map(|p| p.lng),
                    d.capacity,
                    d.restaurant.map(RestaurantId::get)
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn set_orders(&self, orders: &[(RestaurantId, u32)]) -> DispatchResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt =
                tx.prepare_cached("UPDATE restaurants SET orders_count = ?2 WHERE id = ?1")?;
            for &(id, count) in orders {
                if stmt.execute(params![id.get(), count])? == 0 {
                    return Err(DispatchError::UnknownRestaurant(id));
                }
            }
        }
        tx.commit()?;
        Ok(())
    }
}
