//! Binary encoding of a tile's segment list.
//!
//! A tile value is a length-prefixed array of `[lat1, lng1, lat2, lng2]`
//! `f64` quadruples in bincode's standard configuration.  Floats are written
//! as raw little-endian IEEE-754, so decoding returns bit-identical values.

use bincode::config::{Configuration, standard};

use crate::tile::RoadSegment;
use crate::{RoadsError, RoadsResult};

#[inline]
fn config() -> Configuration {
    standard()
}

/// Encode `segments` as one tile value.
pub fn encode_segments(segments: &[RoadSegment]) -> RoadsResult<Vec<u8>> {
    let raw: Vec<[f64; 4]> = segments.iter().map(|s| s.to_array()).collect();
    bincode::serde::encode_to_vec(&raw, config())
        .map_err(|e| RoadsError::Codec(e.to_string()))
}

/// Decode a tile value produced by [`encode_segments`].
pub fn decode_segments(bytes: &[u8]) -> RoadsResult<Vec<RoadSegment>> {
    let (raw, _): (Vec<[f64; 4]>, usize) = bincode::serde::decode_from_slice(bytes, config())
        .map_err(|e| RoadsError::Codec(e.to_string()))?;
    Ok(raw.into_iter().map(RoadSegment::from_array).collect())
}
