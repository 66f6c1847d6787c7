//! Streaming polyline decoder.
//!
//! # Input format
//!
//! A single JSON array of polylines, each an array of `[longitude, latitude]`
//! pairs (longitude first, GeoJSON order):
//!
//! ```json
//! [
//!   [[23.3080, 42.6886], [23.3090, 42.6890], [23.3101, 42.6893]],
//!   [[23.3200, 42.7001], [23.3205, 42.7010]]
//! ]
//! ```
//!
//! # Memory note
//!
//! Road datasets for a capital city run to hundreds of megabytes.  The
//! stream walks the outer array by hand and hands each element to
//! `serde_json` separately, so only the current polyline is resident.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::iter::FusedIterator;
use std::path::Path;

use serde::Deserialize;

use crate::tile::{RoadSegment, TileKey};
use crate::{RoadsError, RoadsResult};

#[derive(Copy, Clone, PartialEq, Eq)]
enum ArrayState {
    NotStarted,
    Open,
    Closed,
}

/// Lazy, finite, non-restartable sequence of `(TileKey, RoadSegment)` pairs.
///
/// For every pair of consecutive points the segment is yielded twice: once
/// under its start tile and once under its end tile, even when both are the
/// same tile.  After the first error the stream is exhausted.
///
/// Wrap unbuffered readers in a [`BufReader`]; the outer array is scanned one
/// byte at a time.
pub struct SegmentStream<R: Read> {
    reader:    R,
    state:     ArrayState,
    polylines: usize,
    points:    Vec<[f64; 2]>,
    cursor:    usize,
    pending:   Option<(TileKey, RoadSegment)>,
    finished:  bool,
}

impl SegmentStream<BufReader<File>> {
    /// Open a dataset file with a buffered reader.
    pub fn open(path: &Path) -> RoadsResult<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> SegmentStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            state:     ArrayState::NotStarted,
            polylines: 0,
            points:    Vec::new(),
            cursor:    0,
            pending:   None,
            finished:  false,
        }
    }

    /// Number of polylines decoded so far.
    pub fn polylines_read(&self) -> usize {
        self.polylines
    }

    // ── Outer-array walking ───────────────────────────────────────────────

    /// Mark the outer array closed.  Only whitespace may follow it.
    fn close(&mut self) -> RoadsResult<Option<Vec<[f64; 2]>>> {
        self.state = ArrayState::Closed;
        match read_skipping_ws(&mut self.reader)? {
            None => Ok(None),
            Some(b) => Err(RoadsError::DatasetFormat(format!(
                "unexpected {:?} after the closing ']' of the dataset",
                b as char
            ))),
        }
    }

    /// Read the next polyline, or `None` once the closing `]` is reached.
    fn next_polyline(&mut self) -> RoadsResult<Option<Vec<[f64; 2]>>> {
        let first = match self.state {
            ArrayState::Closed => return Ok(None),
            ArrayState::NotStarted => {
                match read_skipping_ws(&mut self.reader)? {
                    Some(b'[') => {}
                    Some(b) => {
                        return Err(RoadsError::DatasetFormat(format!(
                            "expected '[' at start of dataset, found {:?}",
                            b as char
                        )));
                    }
                    None => return Err(RoadsError::DatasetFormat("dataset is empty".into())),
                }
                self.state = ArrayState::Open;
                match read_skipping_ws(&mut self.reader)? {
                    Some(b']') => return self.close(),
                    Some(b) => b,
                    None => return Err(unexpected_eof()),
                }
            }
            ArrayState::Open => match read_skipping_ws(&mut self.reader)? {
                Some(b',') => match read_skipping_ws(&mut self.reader)? {
                    Some(b) => b,
                    None => return Err(unexpected_eof()),
                },
                Some(b']') => return self.close(),
                Some(b) => {
                    return Err(RoadsError::DatasetFormat(format!(
                        "expected ',' or ']' after polyline {}, found {:?}",
                        self.polylines, b as char
                    )));
                }
                None => return Err(unexpected_eof()),
            },
        };

        let index = self.polylines;

        // The first byte of the element has already been consumed; put it
        // back in front of the reader for serde_json.
        let chained = io::Cursor::new([first]).chain(&mut self.reader);
        let mut de = serde_json::Deserializer::from_reader(chained);
        let raw = Vec::<Vec<f64>>::deserialize(&mut de).map_err(|e| {
            if e.is_io() {
                RoadsError::Io(e.into())
            } else {
                RoadsError::DatasetFormat(format!("polyline {index}: {e}"))
            }
        })?;
        self.polylines += 1;

        raw.into_iter()
            .enumerate()
            .map(|(i, point)| match point.as_slice() {
                [lng, lat] if lng.is_finite() && lat.is_finite() => Ok([*lng, *lat]),
                _ => Err(RoadsError::DatasetFormat(format!(
                    "polyline {index}, point {i}: expected a [lng, lat] pair, got {point:?}"
                ))),
            })
            .collect::<RoadsResult<Vec<_>>>()
            .map(Some)
    }
}

impl<R: Read> Iterator for SegmentStream<R> {
    type Item = RoadsResult<(TileKey, RoadSegment)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.pending.take() {
                return Some(Ok(entry));
            }
            if self.finished {
                return None;
            }

            if self.cursor + 1 < self.points.len() {
                let segment = RoadSegment::from_lng_lat(
                    self.points[self.cursor],
                    self.points[self.cursor + 1],
                );
                self.cursor += 1;

                let [start_tile, end_tile] = segment.tiles();
                self.pending = Some((end_tile, segment));
                return Some(Ok((start_tile, segment)));
            }

            match self.next_polyline() {
                Ok(Some(points)) => {
                    self.points = points;
                    self.cursor = 0;
                }
                Ok(None) => {
                    self.finished = true;
                    self.points.clear();
                    return None;
                }
                Err(e) => {
                    self.finished = true;
                    self.points.clear();
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<R: Read> FusedIterator for SegmentStream<R> {}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Next non-whitespace byte, or `None` at end of input.
fn read_skipping_ws(reader: &mut impl Read) -> io::Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) if byte[0].is_ascii_whitespace() => continue,
            Ok(_) => return Ok(Some(byte[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

fn unexpected_eof() -> RoadsError {
    RoadsError::DatasetFormat("unexpected end of dataset inside the polyline array".into())
}
