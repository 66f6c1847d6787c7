//! Geographic coordinate type and the geometry shared by sampling,
//! assignment scoring, and reporting.
//!
//! Two distance notions coexist here:
//!
//! - [`haversine_km`]: great-circle distance in kilometres.  Used for every
//!   driver/restaurant score and for the report.
//! - [`point_segment_distance_deg`]: planar distance in *degrees* from a
//!   point to a segment.  Used by the road sampler's radius filter.  It does
//!   not account for longitude convergence; at city scale and short segments
//!   the error is tolerated.

use crate::SimRng;

/// Mean Earth radius, kilometres.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// A WGS-84 geographic coordinate in double precision.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Linear interpolation towards `other`, independently per axis.
    ///
    /// `t = 0` returns `self`, `t = 1` returns `other`.  This is not a
    /// geodesic interpolation; for segments a few hundred metres long the
    /// difference is negligible.
    #[inline]
    pub fn lerp(self, other: GeoPoint, t: f64) -> GeoPoint {
        GeoPoint {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }

    /// A point uniformly distributed in the disc of `radius_km` around
    /// `self`.
    ///
    /// Polar method: `r = R·√u` keeps the density uniform over the area, and
    /// the longitude offset is stretched by `1 / cos(lat)`.
    pub fn random_offset(self, radius_km: f64, rng: &mut SimRng) -> GeoPoint {
        let distance = radius_km * rng.random::<f64>().sqrt();
        let angle = 2.0 * std::f64::consts::PI * rng.random::<f64>();

        let d_lat = distance / EARTH_RADIUS_KM * angle.cos();
        let d_lng = distance / (EARTH_RADIUS_KM * self.lat.to_radians().cos()) * angle.sin();

        GeoPoint {
            lat: self.lat + d_lat.to_degrees(),
            lng: self.lng + d_lng.to_degrees(),
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Haversine great-circle distance between `a` and `b` in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = lat2 - lat1;
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat * 0.5).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2);

    2.0 * h.sqrt().asin() * EARTH_RADIUS_KM
}

/// Planar distance in degrees from `p` to the segment `a`–`b`.
///
/// The projection parameter is clamped to `[0, 1]`, so points beyond either
/// end measure to the nearer endpoint.  A zero-length segment degrades to the
/// point distance from `a`.
pub fn point_segment_distance_deg(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> f64 {
    let dx = b.lng - a.lng;
    let dy = b.lat - a.lat;

    if dx == 0.0 && dy == 0.0 {
        return ((p.lat - a.lat).powi(2) + (p.lng - a.lng).powi(2)).sqrt();
    }

    let t = ((p.lat - a.lat) * dy + (p.lng - a.lng) * dx) / (dx * dx + dy * dy);
    let t = t.clamp(0.0, 1.0);

    let proj_lat = a.lat + t * dy;
    let proj_lng = a.lng + t * dx;

    ((p.lat - proj_lat).powi(2) + (p.lng - proj_lng).powi(2)).sqrt()
}
