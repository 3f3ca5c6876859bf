//! Per-bin reductions
//!
//! Every reduction takes the y-values of one bin. Empty input yields NaN
//! (except `Count` and `Sum`, which yield 0), so that all modes report empty
//! bins the same way. Zero means or medians are not guarded: the ratio
//! statistics return Inf or NaN in that case.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

/// A named per-bin reduction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Statistic {
    Mean,
    /// Default for response profiles
    #[default]
    Median,
    /// Population standard deviation
    Std,
    Count,
    Sum,
    Min,
    Max,
    /// Standard deviation divided by mean
    StdOverMean,
    /// (q84 - q16) / (2 * median)
    IqrOverMed,
}

impl Statistic {
    /// All statistics, in declaration order
    pub const ALL: [Statistic; 9] = [
        Statistic::Mean,
        Statistic::Median,
        Statistic::Std,
        Statistic::Count,
        Statistic::Sum,
        Statistic::Min,
        Statistic::Max,
        Statistic::StdOverMean,
        Statistic::IqrOverMed,
    ];

    const NAMES: &'static str = "mean, median, std, count, sum, min, max, stdOverMean, iqrOverMed";

    /// Name used when parsing and serializing
    pub fn name(&self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Median => "median",
            Statistic::Std => "std",
            Statistic::Count => "count",
            Statistic::Sum => "sum",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::StdOverMean => "stdOverMean",
            Statistic::IqrOverMed => "iqrOverMed",
        }
    }

    /// Value reported for a bin with no entries
    pub fn empty_value(&self) -> f64 {
        match self {
            Statistic::Count | Statistic::Sum => 0.0,
            _ => f64::NAN,
        }
    }

    /// Reduce the values of one bin
    pub fn reduce(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return self.empty_value();
        }
        match self {
            Statistic::Mean => mean(values),
            Statistic::Median => median(values),
            Statistic::Std => std_dev(values),
            Statistic::Count => values.len() as f64,
            Statistic::Sum => values.iter().sum(),
            Statistic::Min => fold_nan_aware(values, f64::min),
            Statistic::Max => fold_nan_aware(values, f64::max),
            Statistic::StdOverMean => std_over_mean(values),
            Statistic::IqrOverMed => iqr_over_median(values),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Statistic {
    type Err = StatsError;

    fn from_str(s: &str) -> StatsResult<Self> {
        Statistic::ALL
            .into_iter()
            .find(|stat| stat.name() == s)
            .ok_or_else(|| StatsError::UnknownStatistic {
                name: s.to_string(),
                expected: Statistic::NAMES,
            })
    }
}

/// The dispersion measures accepted by resolution curves
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolutionStatistic {
    #[default]
    Std,
    StdOverMean,
    IqrOverMed,
}

impl ResolutionStatistic {
    pub const ALL: [ResolutionStatistic; 3] = [
        ResolutionStatistic::Std,
        ResolutionStatistic::StdOverMean,
        ResolutionStatistic::IqrOverMed,
    ];

    const NAMES: &'static str = "std, stdOverMean, iqrOverMed";

    pub fn name(&self) -> &'static str {
        Statistic::from(*self).name()
    }

    pub fn reduce(&self, values: &[f64]) -> f64 {
        Statistic::from(*self).reduce(values)
    }
}

impl From<ResolutionStatistic> for Statistic {
    fn from(stat: ResolutionStatistic) -> Self {
        match stat {
            ResolutionStatistic::Std => Statistic::Std,
            ResolutionStatistic::StdOverMean => Statistic::StdOverMean,
            ResolutionStatistic::IqrOverMed => Statistic::IqrOverMed,
        }
    }
}

impl fmt::Display for ResolutionStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResolutionStatistic {
    type Err = StatsError;

    fn from_str(s: &str) -> StatsResult<Self> {
        ResolutionStatistic::ALL
            .into_iter()
            .find(|stat| stat.name() == s)
            .ok_or_else(|| StatsError::UnknownStatistic {
                name: s.to_string(),
                expected: ResolutionStatistic::NAMES,
            })
    }
}

// MARK: - Reductions

/// Arithmetic mean (NaN on empty input)
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, ddof = 0 (NaN on empty input)
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Median (NaN on empty input or when any value is NaN)
pub fn median(values: &[f64]) -> f64 {
    percentile(values, 50.0)
}

/// Percentile with linear interpolation between closest ranks
///
/// `p` is in percent. For `n` sorted values the rank is `(n - 1) * p / 100`.
/// Returns NaN on empty input or when any value is NaN.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    match sorted(values) {
        Some(sorted) => percentile_sorted(&sorted, p),
        None => f64::NAN,
    }
}

/// Percentile of already sorted, NaN-free values
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let rank = (sorted.len() - 1) as f64 * (p / 100.0).clamp(0.0, 1.0);
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = rank - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Standard deviation over mean
pub fn std_over_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    std_dev(values) / mean(values)
}

/// Half the 16-84 percentile width over the median
///
/// For a Gaussian the 16th and 84th percentiles sit one sigma either side of
/// the median, so this approximates sigma / median with less sensitivity to
/// tails.
pub fn iqr_over_median(values: &[f64]) -> f64 {
    let Some(sorted) = sorted(values) else {
        return f64::NAN;
    };
    let q84 = percentile_sorted(&sorted, 84.0);
    let q16 = percentile_sorted(&sorted, 16.0);
    let med = percentile_sorted(&sorted, 50.0);
    (q84 - q16) / (2.0 * med)
}

fn sorted(values: &[f64]) -> Option<Vec<f64>> {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(sorted)
}

fn fold_nan_aware(values: &[f64], f: fn(f64, f64) -> f64) -> f64 {
    if values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    values.iter().copied().reduce(f).unwrap_or(f64::NAN)
}
