//! Weighted 2D histograms
//!
//! Cells are stored row-major with x as the fast index. Pairs outside either
//! edge range, or with a NaN coordinate, are dropped.

use serde::{Deserialize, Serialize};

use crate::binning::BinEdges;
use crate::error::{ensure_same_len, StatsResult};

/// A 2D histogram of summed weights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram2d {
    x_edges: BinEdges,
    y_edges: BinEdges,
    /// Summed weight per cell, `cells[iy * nx + ix]`
    cells: Vec<f64>,
    /// Pairs that fell outside the grid
    dropped: usize,
}

impl Histogram2d {
    /// Accumulate `weights[i]` into the cell containing `(x[i], y[i])`
    pub fn weighted(
        x: &[f64],
        y: &[f64],
        x_edges: &BinEdges,
        y_edges: &BinEdges,
        weights: &[f64],
    ) -> StatsResult<Self> {
        ensure_same_len("y", x.len(), y.len())?;
        ensure_same_len("weights", x.len(), weights.len())?;

        let nx = x_edges.bin_count();
        let mut cells = vec![0.0; nx * y_edges.bin_count()];
        let mut dropped = 0;

        for ((&xv, &yv), &w) in x.iter().zip(y).zip(weights) {
            match (x_edges.find_bin(xv), y_edges.find_bin(yv)) {
                (Some(ix), Some(iy)) => cells[iy * nx + ix] += w,
                _ => dropped += 1,
            }
        }

        tracing::debug!(
            nx,
            ny = y_edges.bin_count(),
            points = x.len(),
            dropped,
            "filled 2d histogram"
        );

        Ok(Self {
            x_edges: x_edges.clone(),
            y_edges: y_edges.clone(),
            cells,
            dropped,
        })
    }

    /// Histogram where every point weighs `1 / N`
    ///
    /// Cell values are fractions of all points; they sum to 1 when no point
    /// falls outside the grid.
    pub fn fraction_of_total(
        x: &[f64],
        y: &[f64],
        x_edges: &BinEdges,
        y_edges: &BinEdges,
    ) -> StatsResult<Self> {
        let weights = vec![1.0 / x.len() as f64; x.len()];
        Self::weighted(x, y, x_edges, y_edges, &weights)
    }

    pub fn nx(&self) -> usize {
        self.x_edges.bin_count()
    }

    pub fn ny(&self) -> usize {
        self.y_edges.bin_count()
    }

    pub fn x_edges(&self) -> &BinEdges {
        &self.x_edges
    }

    pub fn y_edges(&self) -> &BinEdges {
        &self.y_edges
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Summed weight in cell `(ix, iy)`
    pub fn value(&self, ix: usize, iy: usize) -> f64 {
        self.cells[iy * self.nx() + ix]
    }

    /// Sum over all cells
    pub fn total(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// Largest cell value
    pub fn max(&self) -> f64 {
        self.cells.iter().copied().fold(0.0, f64::max)
    }

    /// Smallest strictly positive cell value, if any cell is filled
    pub fn min_positive(&self) -> Option<f64> {
        self.cells
            .iter()
            .copied()
            .filter(|&v| v > 0.0)
            .reduce(f64::min)
    }

    /// Iterate over non-empty cells as `(ix, iy, value)`
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let nx = self.nx();
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0.0)
            .map(move |(i, &v)| (i % nx, i / nx, v))
    }
}
