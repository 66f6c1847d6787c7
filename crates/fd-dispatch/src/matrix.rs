//! Dense driver × restaurant distance matrix.

use fd_core::{GeoPoint, haversine_km};

/// Row-major haversine distances in kilometres: row `i` is driver `i`,
/// column `j` is restaurant `j`.
#[derive(Clone, Debug, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    /// Compute every `from[i] → to[j]` distance.
    ///
    /// With the `parallel` feature, rows are filled on Rayon's pool; the
    /// result is identical either way.
    pub fn build(from: &[GeoPoint], to: &[GeoPoint]) -> Self {
        let (rows, cols) = (from.len(), to.len());
        let mut data = vec![0.0; rows * cols];

        if cols > 0 {
            #[cfg(not(feature = "parallel"))]
            {
                data.chunks_mut(cols)
                    .zip(from)
                    .for_each(|(row, &p)| fill_row(row, p, to));
            }

            #[cfg(feature = "parallel")]
            {
                use rayon::prelude::*;

                data.par_chunks_mut(cols)
                    .zip(from.par_iter())
                    .for_each(|(row, &p)| fill_row(row, p, to));
            }
        }

        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Smallest entry of `row`; `f64::INFINITY` when there are no columns.
    pub fn row_min(&self, row: usize) -> f64 {
        self.row(row).iter().copied().fold(f64::INFINITY, f64::min)
    }
}

fn fill_row(row: &mut [f64], from: GeoPoint, to: &[GeoPoint]) {
    for (cell, &target) in row.iter_mut().zip(to) {
        *cell = haversine_km(from, target);
    }
}
