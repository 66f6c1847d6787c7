//! The key/value store holding encoded tiles.
//!
//! # Pluggability
//!
//! The indexer and the sampler only see the [`TileCache`] trait, so a
//! deployment can back it with whatever shared store it runs.  Two backends
//! ship here: [`MemoryTileCache`] and, with the `sqlite` feature,
//! [`SqliteTileCache`](crate::SqliteTileCache).
//!
//! # Flags
//!
//! Durable boolean markers (e.g. [`PRELOAD_FLAG`](crate::PRELOAD_FLAG)) live
//! in their own namespace.  `delete_by_prefix` never removes a flag, even if
//! the flag name shares the tile prefix.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::{CacheError, CacheResult};

// ── TileCache trait ───────────────────────────────────────────────────────────

/// Tile storage keyed by full cache key (`"roads:{lat}_{lng}"`).
///
/// # Consistency
///
/// Each key is replaced atomically: a reader sees either the old or the new
/// value for a given key, never a mix.  A batch need not be atomic across
/// keys.
pub trait TileCache: Send + Sync {
    /// Fetch one value.
    fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Fetch several values in key order.
    fn get_many(&self, keys: &[String]) -> CacheResult<Vec<Option<Vec<u8>>>> {
        keys.iter().map(|k| self.get(k)).collect()
    }

    /// Write all `entries` in one round trip, replacing existing values.
    fn set_batch(&self, entries: Vec<(String, Vec<u8>)>) -> CacheResult<()>;

    /// Delete every value whose key starts with `prefix`.  Returns the count.
    fn delete_by_prefix(&self, prefix: &str) -> CacheResult<usize>;

    /// Set a durable flag with no expiry.
    fn set_flag(&self, name: &str) -> CacheResult<()>;

    fn clear_flag(&self, name: &str) -> CacheResult<()>;

    fn has_flag(&self, name: &str) -> CacheResult<bool>;
}

impl<C: TileCache + ?Sized> TileCache for Arc<C> {
    fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn get_many(&self, keys: &[String]) -> CacheResult<Vec<Option<Vec<u8>>>> {
        (**self).get_many(keys)
    }

    fn set_batch(&self, entries: Vec<(String, Vec<u8>)>) -> CacheResult<()> {
        (**self).set_batch(entries)
    }

    fn delete_by_prefix(&self, prefix: &str) -> CacheResult<usize> {
        (**self).delete_by_prefix(prefix)
    }

    fn set_flag(&self, name: &str) -> CacheResult<()> {
        (**self).set_flag(name)
    }

    fn clear_flag(&self, name: &str) -> CacheResult<()> {
        (**self).clear_flag(name)
    }

    fn has_flag(&self, name: &str) -> CacheResult<bool> {
        (**self).has_flag(name)
    }
}

// ── MemoryTileCache ───────────────────────────────────────────────────────────

/// Process-local cache.  A whole batch is applied under one write lock.
#[derive(Default)]
pub struct MemoryTileCache {
    tiles: RwLock<HashMap<String, Vec<u8>>>,
    flags: RwLock<HashSet<String>>,
}

impl MemoryTileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tile values.
    pub fn len(&self) -> usize {
        self.tiles.read().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> CacheError {
    CacheError::Unavailable("memory cache lock poisoned".into())
}

impl TileCache for MemoryTileCache {
    fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let tiles = self.tiles.read().map_err(|_| poisoned())?;
        Ok(tiles.get(key).cloned())
    }

    fn get_many(&self, keys: &[String]) -> CacheResult<Vec<Option<Vec<u8>>>> {
        let tiles = self.tiles.read().map_err(|_| poisoned())?;
        Ok(keys.iter().map(|k| tiles.get(k).cloned()).collect())
    }

    fn set_batch(&self, entries: Vec<(String, Vec<u8>)>) -> CacheResult<()> {
        let mut tiles = self.tiles.write().map_err(|_| poisoned())?;
        tiles.extend(entries);
        Ok(())
    }

    fn delete_by_prefix(&self, prefix: &str) -> CacheResult<usize> {
        let mut tiles = self.tiles.write().map_err(|_| poisoned())?;
        let before = tiles.len();
        tiles.retain(|k, _| !k.starts_with(prefix));
        Ok(before - tiles.len())
    }

    fn set_flag(&self, name: &str) -> CacheResult<()> {
        self.flags.write().map_err(|_| poisoned())?.insert(name.to_owned());
        Ok(())
    }

    fn clear_flag(&self, name: &str) -> CacheResult<()> {
        self.flags.write().map_err(|_| poisoned())?.remove(name);
        Ok(())
    }

    fn has_flag(&self, name: &str) -> CacheResult<bool> {
        Ok(self.flags.read().map_err(|_| poisoned())?.contains(name))
    }
}
