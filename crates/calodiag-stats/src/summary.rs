//! Summary statistics for a response distribution
//!
//! Provides a one-shot summary of a whole sample:
//! - Mean, variance, standard deviation
//! - Min, max, range
//! - Robust statistics (median, MAD, 16th/84th percentiles)

use serde::{Deserialize, Serialize};

use crate::statistic::percentile_sorted;

/// Whole-sample summary, the global counterpart of the per-bin reductions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of finite values
    pub count: usize,
    /// Number of missing/NaN/infinite values
    pub missing: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population variance
    pub variance: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub median: f64,
    /// Median absolute deviation from the median
    pub mad: f64,
    /// 16th percentile (median - 1 sigma for a Gaussian)
    pub q16: f64,
    /// 84th percentile (median + 1 sigma for a Gaussian)
    pub q84: f64,
}

impl SummaryStats {
    /// Compute summary statistics from data, skipping non-finite values
    pub fn from_data(data: &[f64]) -> Self {
        let mut sorted: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
        let missing = data.len() - sorted.len();

        if sorted.is_empty() {
            return Self::empty(missing);
        }

        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;
        let median = percentile_sorted(&sorted, 50.0);

        let mut deviations: Vec<f64> = sorted.iter().map(|x| (x - median).abs()).collect();
        deviations.sort_by(f64::total_cmp);

        Self {
            count,
            missing,
            min: sorted[0],
            max: sorted[count - 1],
            mean,
            variance,
            std_dev: variance.sqrt(),
            median,
            mad: percentile_sorted(&deviations, 50.0),
            q16: percentile_sorted(&sorted, 16.0),
            q84: percentile_sorted(&sorted, 84.0),
        }
    }

    fn empty(missing: usize) -> Self {
        Self {
            count: 0,
            missing,
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            variance: f64::NAN,
            std_dev: f64::NAN,
            median: f64::NAN,
            mad: f64::NAN,
            q16: f64::NAN,
            q84: f64::NAN,
        }
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Standard deviation over mean (unguarded for zero mean)
    pub fn std_over_mean(&self) -> f64 {
        self.std_dev / self.mean
    }

    /// (q84 - q16) / (2 * median)
    pub fn iqr_over_median(&self) -> f64 {
        (self.q84 - self.q16) / (2.0 * self.median)
    }
}
