//! Interchangeable driver positioning strategies.
//!
//! Fleet generation asks a [`PositionSampler`] for a starting point near a
//! restaurant.  Which implementation answers is a configuration choice
//! ([`PositionStrategy`]), not something callers branch on.

use std::fmt;
use std::str::FromStr;

use fd_core::{GeoPoint, SimRng};

use crate::cache::TileCache;
use crate::sampler::{RoadSampler, SamplerConfig};

/// Produces a random location near `center`.
///
/// Implementations return `None` when they cannot find a location; callers
/// decide whether to retry with another center or radius.
pub trait PositionSampler: Send + Sync {
    fn random_point_near(
        &self,
        center:    GeoPoint,
        radius_km: f64,
        rng:       &mut SimRng,
    ) -> Option<GeoPoint>;
}

impl<C: TileCache> PositionSampler for RoadSampler<C> {
    fn random_point_near(
        &self,
        center:    GeoPoint,
        radius_km: f64,
        rng:       &mut SimRng,
    ) -> Option<GeoPoint> {
        self.sample(center, radius_km, rng)
    }
}

/// Uniform point in a disc, ignoring the road network.  Never fails.
pub struct RandomOffsetSampler;

impl PositionSampler for RandomOffsetSampler {
    fn random_point_near(
        &self,
        center:    GeoPoint,
        radius_km: f64,
        rng:       &mut SimRng,
    ) -> Option<GeoPoint> {
        Some(center.random_offset(radius_km, rng))
    }
}

// ── Strategy selection ────────────────────────────────────────────────────────

/// Which [`PositionSampler`] to build.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PositionStrategy {
    /// On-road points from the tile cache.
    #[default]
    Roads,
    /// Uniform disc around the center.
    RandomOffset,
}

impl PositionStrategy {
    /// Build the configured sampler.  `cache` and `config` are ignored by
    /// strategies that do not read tiles.
    pub fn build<C>(self, cache: C, config: SamplerConfig) -> Box<dyn PositionSampler>
    where
        C: TileCache + 'static,
    {
        match self {
            PositionStrategy::Roads => Box::new(RoadSampler::new(cache, config)),
            PositionStrategy::RandomOffset => Box::new(RandomOffsetSampler),
        }
    }
}

impl FromStr for PositionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "roads" => Ok(PositionStrategy::Roads),
            "random-offset" | "random" => Ok(PositionStrategy::RandomOffset),
            other => Err(format!(
                "unknown position strategy {other:?}: expected \"roads\" or \"random-offset\""
            )),
        }
    }
}

impl fmt::Display for PositionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PositionStrategy::Roads => "roads",
            PositionStrategy::RandomOffset => "random-offset",
        })
    }
}
