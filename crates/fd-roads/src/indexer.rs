//! Full-snapshot preload of road tiles into a [`TileCache`].
//!
//! # Run shape
//!
//! ```text
//! clear PRELOAD_FLAG
//! delete every key under the tile prefix
//! for (tile, segment) in stream:
//!     buffer[tile].push(segment)
//!     if buffer has flush_threshold distinct tiles: flush, clear buffer
//! flush remainder
//! set PRELOAD_FLAG
//! ```
//!
//! A failure at any step aborts the run with the flag unset.  Tiles already
//! flushed stay in the cache; nothing is rolled back.
//!
//! A tile whose entries straddle two flushes is merged with what the earlier
//! flush wrote in this run, so every segment stays reachable from its
//! endpoint tiles.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Instant;

use log::{debug, info};

use crate::cache::TileCache;
use crate::codec::{decode_segments, encode_segments};
use crate::decoder::SegmentStream;
use crate::tile::{RoadSegment, TILE_PREFIX, TileKey};
use crate::RoadsResult;

/// Cache flag set after a complete, successful preload.
pub const PRELOAD_FLAG: &str = "roads:preloaded";

/// Indexer tuning.
#[derive(Clone, Debug)]
pub struct IndexerConfig {
    /// Flush once the buffer holds this many distinct tiles.  Default: 1000.
    pub flush_threshold: usize,
    /// Key namespace wiped before the first flush.  Default: `"roads:"`.
    pub prefix: String,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            flush_threshold: 1_000,
            prefix:          TILE_PREFIX.to_owned(),
        }
    }
}

/// Counters reported by a successful [`TileIndexer::preload`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreloadStats {
    /// `(tile, segment)` entries consumed from the stream.
    pub entries:       u64,
    /// Tile values written, counting a tile once per flush it appears in.
    pub tiles_written: u64,
    /// `set_batch` round trips.
    pub flushes:       u64,
    /// Stale keys removed before the first flush.
    pub stale_removed: u64,
}

/// Streams `(TileKey, RoadSegment)` entries into a cache, replacing the
/// previous snapshot.
pub struct TileIndexer<C: TileCache> {
    cache:  C,
    config: IndexerConfig,
}

impl<C: TileCache> TileIndexer<C> {
    pub fn new(cache: C, config: IndexerConfig) -> Self {
        Self { cache, config }
    }

    /// `true` once a preload has completed and no later run has started.
    pub fn is_preloaded(&self) -> RoadsResult<bool> {
        Ok(self.cache.has_flag(PRELOAD_FLAG)?)
    }

    /// Decode the dataset at `path` and preload it.
    pub fn preload_file(&self, path: &Path) -> RoadsResult<PreloadStats> {
        info!("Preloading road tiles from {}", path.display());
        self.preload(SegmentStream::open(path)?)
    }

    /// Replace the cached snapshot with the entries of `stream`.
    pub fn preload<I>(&self, stream: I) -> RoadsResult<PreloadStats>
    where
        I: IntoIterator<Item = RoadsResult<(TileKey, RoadSegment)>>,
    {
        let started = Instant::now();
        let mut stats = PreloadStats::default();

        self.cache.clear_flag(PRELOAD_FLAG)?;
        stats.stale_removed = self.cache.delete_by_prefix(&self.config.prefix)? as u64;
        debug!("Removed {} stale tile keys", stats.stale_removed);

        let threshold = self.config.flush_threshold.max(1);
        let mut buffer: HashMap<TileKey, Vec<RoadSegment>> = HashMap::with_capacity(threshold);
        let mut written: HashSet<TileKey> = HashSet::new();

        for entry in stream {
            let (tile, segment) = entry?;
            stats.entries += 1;
            buffer.entry(tile).or_default().push(segment);

            if buffer.len() >= threshold {
                self.flush(&mut buffer, &mut written, &mut stats)?;
            }
        }

        if !buffer.is_empty() {
            self.flush(&mut buffer, &mut written, &mut stats)?;
        }

        self.cache.set_flag(PRELOAD_FLAG)?;

        info!(
            "Preload complete: {} entries, {} distinct tiles, {} flushes in {:?}",
            stats.entries,
            written.len(),
            stats.flushes,
            started.elapsed()
        );
        Ok(stats)
    }

    /// Encode and write every buffered tile in one batch, then empty the
    /// buffer.
    fn flush(
        &self,
        buffer:  &mut HashMap<TileKey, Vec<RoadSegment>>,
        written: &mut HashSet<TileKey>,
        stats:   &mut PreloadStats,
    ) -> RoadsResult<()> {
        let mut batch: Vec<(String, Vec<u8>)> = Vec::with_capacity(buffer.len());

        for (tile, mut segments) in buffer.drain() {
            let key = self.key_for(tile);

            // Already flushed earlier in this run: keep those segments.
            if !written.insert(tile) {
                if let Some(bytes) = self.cache.get(&key)? {
                    let mut merged = decode_segments(&bytes)?;
                    merged.append(&mut segments);
                    segments = merged;
                }
            }

            batch.push((key, encode_segments(&segments)?));
        }

        stats.tiles_written += batch.len() as u64;
        stats.flushes += 1;
        debug!("Flushing {} tiles (flush #{})", batch.len(), stats.flushes);

        self.cache.set_batch(batch)?;
        Ok(())
    }

    fn key_for(&self, tile: TileKey) -> String {
        format!("{}{tile}", self.config.prefix)
    }
}
