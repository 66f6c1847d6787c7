//! SQLite tile cache backend (feature `sqlite`).
//!
//! Tiles and flags live in two tables of one database file, so a preload
//! written by one process is visible to samplers in another.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, params};

use crate::cache::TileCache;
use crate::{CacheError, CacheResult};

/// A [`TileCache`] stored in an SQLite database.
pub struct SqliteTileCache {
    conn: Mutex<Connection>,
}

impl SqliteTileCache {
    /// Open (or create) the database at `path` and initialise the schema.
    pub fn open(path: &Path) -> CacheResult<Self> {
        Self::init(Connection::open(path)?)
    }

    /// A private in-memory database, mainly for tests.
    pub fn in_memory() -> CacheResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> CacheResult<Self> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS tiles (
                 key   TEXT PRIMARY KEY,
                 value BLOB NOT NULL
             );
             CREATE TABLE IF NOT EXISTS flags (
                 name TEXT PRIMARY KEY
             );",
        )?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn lock(&self) -> CacheResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CacheError::Unavailable("sqlite connection lock poisoned".into()))
    }
}

impl TileCache for SqliteTileCache {
    fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let conn = self.lock()?;
        let value = conn
            .query_row("SELECT value FROM tiles WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set_batch(&self, entries: Vec<(String, Vec<u8>)>) -> CacheResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt =
                tx.prepare_cached("INSERT OR REPLACE INTO tiles (key, value) VALUES (?1, ?2)")?;
            for (key, value) in &entries {
                stmt.execute(params![key, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_by_prefix(&self, prefix: &str) -> CacheResult<usize> {
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM tiles WHERE substr(key, 1, length(?1)) = ?1",
            [prefix],
        )?;
        Ok(removed)
    }

    fn set_flag(&self, name: &str) -> CacheResult<()> {
        self.lock()?
            .execute("INSERT OR IGNORE INTO flags (name) VALUES (?1)", [name])?;
        Ok(())
    }

    fn clear_flag(&self, name: &str) -> CacheResult<()> {
        self.lock()?.execute("DELETE FROM flags WHERE name = ?1", [name])?;
        Ok(())
    }

    fn has_flag(&self, name: &str) -> CacheResult<bool> {
        let present: bool = self.lock()?.query_row(
            "SELECT EXISTS(SELECT 1 FROM flags WHERE name = ?1)",
            [name],
            |row| row.get(0),
        )?;
        Ok(present)
    }
}
