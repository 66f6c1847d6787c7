//! Random point on a road near a location.
//!
//! # Algorithm
//!
//! 1. Take the `(2n+1)²` tiles around the query tile (`n = 2` → 5×5) and
//!    shuffle the visitation order.
//! 2. Decode each cached tile and keep segments within the radius.
//! 3. Reservoir-sample one candidate in visitation order: the `k`-th
//!    candidate replaces the held one with probability `1/k`.
//! 4. Stop after `scan_budget` candidates, even mid-tile.
//! 5. Interpolate a uniform point along the chosen segment.
//!
//! Because the reservoir is uniform over whatever has been seen, stopping
//! early (budget or timeout) still yields an unbiased pick among the
//! candidates examined.
//!
//! # Radius units
//!
//! The distance filter is planar and measured in degrees.  With
//! [`RadiusUnit::Degrees`] (the default) the caller's radius is compared to
//! that degree distance unchanged, matching how existing callers tuned their
//! `5.0` radius.  [`RadiusUnit::Kilometres`] converts the radius at
//! [`KM_PER_DEGREE`] first.

use std::time::{Duration, Instant};

use log::{debug, warn};

use fd_core::{GeoPoint, SimRng};

use crate::cache::TileCache;
use crate::codec::decode_segments;
use crate::tile::{RoadSegment, TILE_PREFIX, TileKey};

/// Kilometres per degree of latitude, used by [`RadiusUnit::Kilometres`].
pub const KM_PER_DEGREE: f64 = 111.32;

/// How a sampling radius is compared to the planar degree distance.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RadiusUnit {
    /// Radius compared to degree distance as-is.
    #[default]
    Degrees,
    /// Radius given in kilometres and converted to degrees.
    Kilometres,
}

impl RadiusUnit {
    /// Threshold in degrees for a caller-supplied radius.
    #[inline]
    pub fn threshold_deg(self, radius: f64) -> f64 {
        match self {
            RadiusUnit::Degrees => radius,
            RadiusUnit::Kilometres => radius / KM_PER_DEGREE,
        }
    }
}

/// Sampler tuning.
#[derive(Clone, Debug)]
pub struct SamplerConfig {
    /// Tiles scanned on each side of the query tile.  Default: 2 (5×5).
    pub neighborhood: i64,
    /// Maximum in-radius candidates examined per call.  Default: 100.
    pub scan_budget: usize,
    pub radius_unit: RadiusUnit,
    /// Stop reading further tiles once this much time has passed.
    pub read_timeout: Option<Duration>,
    /// Key namespace the tiles were written under.  Default: `"roads:"`.
    pub prefix: String,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            neighborhood: 2,
            scan_budget:  100,
            radius_unit:  RadiusUnit::Degrees,
            read_timeout: None,
            prefix:       TILE_PREFIX.to_owned(),
        }
    }
}

// ── Reservoir ─────────────────────────────────────────────────────────────────

/// Size-one reservoir over a stream of unknown length.
pub(crate) struct Reservoir<T> {
    seen: usize,
    held: Option<T>,
}

impl<T> Reservoir<T> {
    pub(crate) fn new() -> Self {
        Self { seen: 0, held: None }
    }

    /// Offer the next stream element.
    pub(crate) fn offer(&mut self, item: T, rng: &mut SimRng) {
        self.seen += 1;
        if rng.gen_range(1..=self.seen) == 1 {
            self.held = Some(item);
        }
    }

    pub(crate) fn seen(&self) -> usize {
        self.seen
    }

    pub(crate) fn into_inner(self) -> Option<T> {
        self.held
    }
}

// ── RoadSampler ───────────────────────────────────────────────────────────────

/// Picks random on-road points from a preloaded [`TileCache`].
pub struct RoadSampler<C: TileCache> {
    cache:  C,
    config: SamplerConfig,
}

impl<C: TileCache> RoadSampler<C> {
    pub fn new(cache: C, config: SamplerConfig) -> Self {
        Self { cache, config }
    }

    /// A random point on a road segment within `radius` of `center`, or
    /// `None` when no indexed segment qualifies.
    pub fn sample(&self, center: GeoPoint, radius: f64, rng: &mut SimRng) -> Option<GeoPoint> {
        let segment = self.pick_segment(center, radius, rng)?;
        let t: f64 = rng.gen_range(0.0..=1.0);
        Some(segment.point_at(t))
    }

    /// The reservoir-sampled segment behind [`sample`](Self::sample).
    pub fn pick_segment(
        &self,
        center: GeoPoint,
        radius: f64,
        rng:    &mut SimRng,
    ) -> Option<RoadSegment> {
        let threshold = self.config.radius_unit.threshold_deg(radius);
        let budget = self.config.scan_budget.max(1);

        let mut tiles: Vec<TileKey> = TileKey::of(center)
            .neighborhood(self.config.neighborhood)
            .collect();
        rng.shuffle(&mut tiles);

        let started = Instant::now();
        let mut reservoir = Reservoir::new();

        'tiles: for tile in tiles {
            if let Some(limit) = self.config.read_timeout {
                if started.elapsed() >= limit {
                    debug!(
                        "Sampler read timeout after {:?} with {} candidates",
                        limit,
                        reservoir.seen()
                    );
                    break;
                }
            }

            let key = format!("{}{tile}", self.config.prefix);
            let bytes = match self.cache.get(&key) {
                Ok(Some(bytes)) => bytes,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Tile {key} unreadable, treating as absent: {e}");
                    continue;
                }
            };
            let segments = match decode_segments(&bytes) {
                Ok(segments) => segments,
                Err(e) => {
                    warn!("Tile {key} undecodable, treating as absent: {e}");
                    continue;
                }
            };

            for segment in segments {
                if segment.distance_deg(center) <= threshold {
                    reservoir.offer(segment, rng);
                    if reservoir.seen() >= budget {
                        break 'tiles;
                    }
                }
            }
        }

        reservoir.into_inner()
    }
}
