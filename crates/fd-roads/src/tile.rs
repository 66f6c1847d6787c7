//! Tile grid and road segment types.
//!
//! The grid is a fixed lat/lng lattice of `TILE_SIZE_DEG` cells (~2.2 km
//! north-south).  A cell is identified by the floored quotient of each
//! coordinate, so negative coordinates map to negative indices the same way
//! positive ones do (`-0.01 → -1`, not `0`).

use std::fmt;

use fd_core::{GeoPoint, point_segment_distance_deg};

/// Edge length of a tile, degrees.
pub const TILE_SIZE_DEG: f64 = 0.02;

/// Namespace prefix for tile keys in the cache.
pub const TILE_PREFIX: &str = "roads:";

// ── TileKey ───────────────────────────────────────────────────────────────────

/// Integer grid coordinates of one tile.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct TileKey {
    pub lat: i64,
    pub lng: i64,
}

impl TileKey {
    #[inline]
    pub fn new(lat: i64, lng: i64) -> Self {
        Self { lat, lng }
    }

    /// The tile containing `p`.
    #[inline]
    pub fn of(p: GeoPoint) -> Self {
        Self {
            lat: (p.lat / TILE_SIZE_DEG).floor() as i64,
            lng: (p.lng / TILE_SIZE_DEG).floor() as i64,
        }
    }

    #[inline]
    pub fn offset(self, d_lat: i64, d_lng: i64) -> Self {
        Self { lat: self.lat + d_lat, lng: self.lng + d_lng }
    }

    /// All tiles within `radius` cells of `self` on both axes, row-major
    /// from the south-west corner.  `radius = 2` yields the 5×5 block.
    pub fn neighborhood(self, radius: i64) -> impl Iterator<Item = TileKey> {
        (-radius..=radius)
            .flat_map(move |i| (-radius..=radius).map(move |j| self.offset(i, j)))
    }

    /// Full cache key: `"roads:{lat}_{lng}"`.
    pub fn cache_key(self) -> String {
        format!("{TILE_PREFIX}{self}")
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.lat, self.lng)
    }
}

// ── RoadSegment ───────────────────────────────────────────────────────────────

/// A straight piece of road between two consecutive polyline points.
///
/// Directed as it appeared in the source, but every query treats it as an
/// undirected geometric segment.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct RoadSegment {
    pub start: GeoPoint,
    pub end:   GeoPoint,
}

impl RoadSegment {
    #[inline]
    pub fn new(start: GeoPoint, end: GeoPoint) -> Self {
        Self { start, end }
    }

    /// Build from two source-order `[lng, lat]` pairs.
    #[inline]
    pub fn from_lng_lat(a: [f64; 2], b: [f64; 2]) -> Self {
        Self {
            start: GeoPoint::new(a[1], a[0]),
            end:   GeoPoint::new(b[1], b[0]),
        }
    }

    /// `[lat1, lng1, lat2, lng2]`: the cache value layout.
    #[inline]
    pub fn to_array(self) -> [f64; 4] {
        [self.start.lat, self.start.lng, self.end.lat, self.end.lng]
    }

    #[inline]
    pub fn from_array(v: [f64; 4]) -> Self {
        Self {
            start: GeoPoint::new(v[0], v[1]),
            end:   GeoPoint::new(v[2], v[3]),
        }
    }

    /// The tiles of the two endpoints, start first.  May be equal.
    #[inline]
    pub fn tiles(self) -> [TileKey; 2] {
        [TileKey::of(self.start), TileKey::of(self.end)]
    }

    /// Planar distance in degrees from `p` to this segment.
    #[inline]
    pub fn distance_deg(self, p: GeoPoint) -> f64 {
        point_segment_distance_deg(p, self.start, self.end)
    }

    /// Point at fraction `t` along the segment.
    #[inline]
    pub fn point_at(self, t: f64) -> GeoPoint {
        self.start.lerp(self.end, t)
    }
}
