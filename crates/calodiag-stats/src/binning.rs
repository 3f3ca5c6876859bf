//! Fixed bin edge sequences
//!
//! Edges are generated from integer step indices so that repeated calls with
//! the same parameters always produce bit-identical sequences, independent of
//! any sample data.
//!
//! Intervals are half-open `[e_i, e_{i+1})` except the last one, which also
//! contains its upper edge.

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

/// Lowest exponent of the response x binning (10^-1)
pub const RESPONSE_X_EXP_MIN: f64 = -1.0;
/// Highest exponent of the response x binning (10^3)
pub const RESPONSE_X_EXP_MAX: f64 = 3.0;
/// Exponent step of the response x binning
pub const RESPONSE_X_EXP_STEP: f64 = 0.1;

/// Lower edge of the response y binning
pub const RESPONSE_Y_MIN: f64 = 0.0;
/// Upper edge of the response y binning
pub const RESPONSE_Y_MAX: f64 = 3.0;
/// Width of the response y bins
pub const RESPONSE_Y_STEP: f64 = 0.025;

/// A strictly increasing sequence of bin edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct BinEdges {
    edges: Vec<f64>,
}

impl BinEdges {
    /// Logarithmically spaced edges `10^e` for `e` in `exp_min..=exp_max`
    pub fn log10(exp_min: f64, exp_max: f64, exp_step: f64) -> StatsResult<Self> {
        let count = step_count(exp_min, exp_max, exp_step)?;
        let edges = (0..=count)
            .map(|i| 10f64.powf(exp_min + i as f64 * exp_step))
            .collect();
        Self::from_edges(edges)
    }

    /// Linearly spaced edges from `start` up to `stop`
    ///
    /// `stop` is the last edge when it lies on the step grid; otherwise the
    /// edges end at the last grid point below it, as with `np.arange`.
    pub fn linear(start: f64, stop: f64, step: f64) -> StatsResult<Self> {
        let count = step_count(start, stop, step)?;
        let edges = (0..=count).map(|i| start + i as f64 * step).collect();
        Self::from_edges(edges)
    }

    /// Wrap an explicit edge list after validating it
    pub fn from_edges(edges: Vec<f64>) -> StatsResult<Self> {
        if edges.len() < 2 {
            return Err(StatsError::InvalidBinning {
                message: format!("need at least 2 edges, got {}", edges.len()),
            });
        }
        if let Some(bad) = edges.iter().find(|e| !e.is_finite()) {
            return Err(StatsError::InvalidBinning {
                message: format!("edge {bad} is not finite"),
            });
        }
        if let Some(pair) = edges.windows(2).find(|w| w[1] <= w[0]) {
            return Err(StatsError::InvalidBinning {
                message: format!("edges not strictly increasing at {} -> {}", pair[0], pair[1]),
            });
        }
        Ok(Self { edges })
    }

    /// The x binning shared by both diagnostic plots: 10^-1 .. 10^3 in 0.1 decades
    ///
    /// 41 edges, 40 bins.
    pub fn response_x() -> Self {
        let count = ((RESPONSE_X_EXP_MAX - RESPONSE_X_EXP_MIN) / RESPONSE_X_EXP_STEP).round() as usize;
        Self {
            edges: (0..=count)
                .map(|i| 10f64.powf(RESPONSE_X_EXP_MIN + i as f64 * RESPONSE_X_EXP_STEP))
                .collect(),
        }
    }

    /// The response-axis binning of the 2D histogram: 0 .. 3 in steps of 0.025
    pub fn response_y() -> Self {
        let count = ((RESPONSE_Y_MAX - RESPONSE_Y_MIN) / RESPONSE_Y_STEP).round() as usize;
        Self {
            edges: (0..=count)
                .map(|i| RESPONSE_Y_MIN + i as f64 * RESPONSE_Y_STEP)
                .collect(),
        }
    }

    /// Edge values
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of bins (edges - 1)
    pub fn bin_count(&self) -> usize {
        self.edges.len() - 1
    }

    /// Lowest edge
    pub fn first(&self) -> f64 {
        self.edges[0]
    }

    /// Highest edge
    pub fn last(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    /// Arithmetic midpoints of consecutive edges
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    /// Index of the bin containing `value`
    ///
    /// Returns `None` for NaN and for values outside `[first, last]`.
    pub fn find_bin(&self, value: f64) -> Option<usize> {
        if value.is_nan() || value < self.first() || value > self.last() {
            return None;
        }
        if value == self.last() {
            return Some(self.bin_count() - 1);
        }
        // Number of edges <= value, minus one
        let idx = self.edges.partition_point(|&e| e <= value);
        Some(idx - 1)
    }
}

impl TryFrom<Vec<f64>> for BinEdges {
    type Error = StatsError;

    fn try_from(edges: Vec<f64>) -> StatsResult<Self> {
        Self::from_edges(edges)
    }
}

impl From<BinEdges> for Vec<f64> {
    fn from(bins: BinEdges) -> Self {
        bins.edges
    }
}

fn step_count(start: f64, stop: f64, step: f64) -> StatsResult<usize> {
    if !step.is_finite() || step <= 0.0 {
        return Err(StatsError::InvalidBinning {
            message: format!("step must be positive and finite, got {step}"),
        });
    }
    if !start.is_finite() || !stop.is_finite() || stop <= start {
        return Err(StatsError::InvalidBinning {
            message: format!("range {start}..{stop} is empty or not finite"),
        });
    }
    // Tolerance keeps an exact multiple like 4.0 / 0.1 from losing a step
    Ok(((stop - start) / step + 1e-9).floor() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_x_shape() {
        let bins = BinEdges::response_x();
        assert_eq!(bins.edges().len(), 41);
        assert_eq!(bins.centers().len(), 40);
        assert!((bins.first() - 0.1).abs() < 1e-12);
        assert!((bins.last() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_response_y_shape() {
        let bins = BinEdges::response_y();
        assert_eq!(bins.edges().len(), 121);
        assert_eq!(bins.first(), 0.0);
        assert!((bins.last() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_response_x_matches_generic_constructor() {
        let generic = BinEdges::log10(-1.0, 3.0, 0.1).unwrap();
        assert_eq!(generic, BinEdges::response_x());
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(BinEdges::response_x(), BinEdges::response_x());
        assert_eq!(
            BinEdges::linear(0.0, 3.0, 0.025).unwrap(),
            BinEdges::linear(0.0, 3.0, 0.025).unwrap()
        );
    }

    #[test]
    fn test_centers_are_midpoints() {
        let bins = BinEdges::from_edges(vec![0.0, 1.0, 3.0]).unwrap();
        assert_eq!(bins.centers(), vec![0.5, 2.0]);
    }

    #[test]
    fn test_find_bin_half_open() {
        let bins = BinEdges::from_edges(vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(bins.find_bin(0.0), Some(0));
        assert_eq!(bins.find_bin(0.999), Some(0));
        assert_eq!(bins.find_bin(1.0), Some(1));
        assert_eq!(bins.find_bin(2.5), Some(2));
        // Last bin is closed
        assert_eq!(bins.find_bin(3.0), Some(2));
    }

    #[test]
    fn test_find_bin_out_of_range() {
        let bins = BinEdges::response_x();
        assert_eq!(bins.find_bin(0.05), None);
        assert_eq!(bins.find_bin(1000.5), None);
        assert_eq!(bins.find_bin(f64::NAN), None);
    }

    #[test]
    fn test_find_bin_log_edges() {
        let bins = BinEdges::response_x();
        // 0.5 lies in [10^-0.4, 10^-0.3)
        assert_eq!(bins.find_bin(0.5), Some(6));
        // 10 is the lower edge of bin 20
        assert_eq!(bins.find_bin(bins.edges()[20]), Some(20));
    }

    #[test]
    fn test_linear_never_passes_stop() {
        let bins = BinEdges::linear(0.0, 1.0, 0.4).unwrap();
        assert_eq!(bins.edges().len(), 3);
        assert!((bins.last() - 0.8).abs() < 1e-12);

        let bins = BinEdges::linear(0.0, 1.0, 0.3).unwrap();
        assert_eq!(bins.edges().len(), 4);
        assert!(bins.last() <= 1.0);

        // Step wider than the range leaves a single edge
        assert!(BinEdges::linear(0.0, 1.0, 2.0).is_err());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(BinEdges::linear(0.0, 1.0, 0.0).is_err());
        assert!(BinEdges::linear(1.0, 0.0, 0.1).is_err());
        assert!(BinEdges::log10(0.0, 1.0, f64::NAN).is_err());
        assert!(BinEdges::from_edges(vec![1.0]).is_err());
        assert!(BinEdges::from_edges(vec![0.0, 2.0, 1.0]).is_err());
        assert!(BinEdges::from_edges(vec![0.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn test_serde_rejects_unsorted_edges() {
        let ok: BinEdges = serde_json::from_str("[0.0, 0.5, 1.0]").unwrap();
        assert_eq!(ok.bin_count(), 2);
        assert!(serde_json::from_str::<BinEdges>("[1.0, 0.5]").is_err());
    }
}
