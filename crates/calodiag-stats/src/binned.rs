//! Binned statistics over paired samples
//!
//! Each `(x, y)` pair is assigned to the bin containing `x`; the y-values of
//! every bin are then reduced independently. Pairs whose `x` is NaN or lies
//! outside the edge range are dropped from all bins.

use serde::{Deserialize, Serialize};

use crate::binning::BinEdges;
use crate::error::{ensure_same_len, StatsResult};
use crate::statistic::Statistic;

/// One reduced value per bin, with the binning that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinnedStatistic {
    /// Reduced value per bin (NaN for empty bins, for most statistics)
    pub values: Vec<f64>,
    /// Number of pairs that landed in each bin
    pub counts: Vec<usize>,
    /// Pairs dropped for being out of range or NaN
    pub dropped: usize,
    /// The edges used
    pub edges: BinEdges,
}

impl BinnedStatistic {
    /// Bin midpoints, one per value
    pub fn centers(&self) -> Vec<f64> {
        self.edges.centers()
    }

    /// `(center, value)` pairs, convenient for plotting
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.centers().into_iter().zip(self.values.iter().copied()).collect()
    }

    /// Number of bins with at least one entry
    pub fn filled_bins(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }
}

/// Reduce `y` per x-bin with a named statistic
pub fn binned_statistic(
    x: &[f64],
    y: &[f64],
    edges: &BinEdges,
    statistic: Statistic,
) -> StatsResult<BinnedStatistic> {
    let result = binned_statistic_with(x, y, edges, |values| statistic.reduce(values))?;
    tracing::debug!(
        statistic = %statistic,
        bins = edges.bin_count(),
        filled = result.filled_bins(),
        dropped = result.dropped,
        "computed binned statistic"
    );
    Ok(result)
}

/// Reduce `y` per x-bin with a caller-supplied reduction
///
/// The reducer is also called for empty bins (with an empty slice), so it
/// decides what an empty bin reports.
pub fn binned_statistic_with<F>(
    x: &[f64],
    y: &[f64],
    edges: &BinEdges,
    reducer: F,
) -> StatsResult<BinnedStatistic>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    ensure_same_len("y", x.len(), y.len())?;

    let (groups, dropped) = group_by_bin(x, y, edges);
    let counts = groups.iter().map(Vec::len).collect();
    let values = reduce_groups(&groups, &reducer);

    Ok(BinnedStatistic {
        values,
        counts,
        dropped,
        edges: edges.clone(),
    })
}

/// Split y-values into per-bin groups
fn group_by_bin(x: &[f64], y: &[f64], edges: &BinEdges) -> (Vec<Vec<f64>>, usize) {
    let mut groups = vec![Vec::new(); edges.bin_count()];
    let mut dropped = 0;
    for (&xv, &yv) in x.iter().zip(y) {
        match edges.find_bin(xv) {
            Some(bin) => groups[bin].push(yv),
            None => dropped += 1,
        }
    }
    (groups, dropped)
}

#[cfg(not(feature = "parallel"))]
fn reduce_groups<F>(groups: &[Vec<f64>], reducer: &F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    groups.iter().map(|g| reducer(g.as_slice())).collect()
}

#[cfg(feature = "parallel")]
fn reduce_groups<F>(groups: &[Vec<f64>], reducer: &F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    use rayon::prelude::*;
    groups.par_iter().map(|g| reducer(g.as_slice())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatsError;
    use crate::statistic::ResolutionStatistic;
    use proptest::prelude::*;
    use rstest::rstest;

    fn uniform_response(n: usize) -> Vec<f64> {
        (0..n).map(|i| 0.8 + 0.4 * (i as f64 + 0.5) / n as f64).collect()
    }

    #[test]
    fn test_output_length_matches_bins() {
        let edges = BinEdges::response_x();
        let x = vec![1.0, 5.0, 50.0];
        let y = vec![1.0, 1.1, 0.9];
        let result = binned_statistic(&x, &y, &edges, Statistic::Median).unwrap();
        assert_eq!(result.values.len(), 40);
        assert_eq!(result.counts.iter().sum::<usize>(), 3);
        assert_eq!(result.dropped, 0);
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let edges = BinEdges::response_x();
        let err = binned_statistic(&[1.0, 2.0], &[1.0], &edges, Statistic::Median).unwrap_err();
        assert!(matches!(err, StatsError::LengthMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn test_out_of_range_points_are_dropped() {
        let edges = BinEdges::response_x();
        let x = vec![0.01, 5000.0, f64::NAN, 2.0];
        let y = vec![10.0, 10.0, 10.0, 1.0];
        let result = binned_statistic(&x, &y, &edges, Statistic::Max).unwrap();
        assert_eq!(result.dropped, 3);
        let max = result.values.iter().copied().filter(|v| v.is_finite()).fold(0.0, f64::max);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn test_concentrated_sample() {
        let edges = BinEdges::response_x();
        let x = vec![0.5; 1000];
        let y = uniform_response(1000);
        let result = binned_statistic(&x, &y, &edges, Statistic::Median).unwrap();

        let bin = edges.find_bin(0.5).unwrap();
        assert!((result.values[bin] - 1.0).abs() < 1e-3);
        for (i, v) in result.values.iter().enumerate() {
            if i != bin {
                assert!(v.is_nan(), "bin {i} should be empty");
            }
        }
    }

    #[rstest]
    #[case(Statistic::Median)]
    #[case(Statistic::Std)]
    #[case(Statistic::Mean)]
    #[case(Statistic::StdOverMean)]
    #[case(Statistic::IqrOverMed)]
    fn test_empty_decade_bin_is_nan(#[case] stat: Statistic) {
        let edges = BinEdges::response_x();
        // Nothing in [10, 10^1.1)
        let x = vec![1.0, 2.0, 50.0, 200.0];
        let y = vec![1.0, 0.9, 1.1, 1.0];
        let result = binned_statistic(&x, &y, &edges, stat).unwrap();
        let bin = edges.find_bin(10.0).unwrap();
        assert!(result.values[bin].is_nan());
    }

    #[test]
    fn test_resolution_statistics_share_binning() {
        let edges = BinEdges::response_x();
        let x = vec![3.0; 200];
        let y = uniform_response(200);
        for stat in ResolutionStatistic::ALL {
            let result = binned_statistic(&x, &y, &edges, stat.into()).unwrap();
            assert_eq!(result.filled_bins(), 1);
        }
    }

    #[test]
    fn test_custom_reducer() {
        let edges = BinEdges::from_edges(vec![0.0, 1.0, 2.0]).unwrap();
        let x = vec![0.5, 0.5, 1.5];
        let y = vec![2.0, 4.0, 8.0];
        let result = binned_statistic_with(&x, &y, &edges, |v| v.iter().product()).unwrap();
        assert_eq!(result.values, vec![8.0, 8.0]);
        assert_eq!(result.points(), vec![(0.5, 8.0), (1.5, 8.0)]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let edges = BinEdges::response_x();
        let x: Vec<f64> = (0..5000).map(|i| 10f64.powf(-1.2 + 4.4 * i as f64 / 5000.0)).collect();
        let y: Vec<f64> = (0..5000).map(|i| 0.5 + ((i * 7919) % 1000) as f64 / 1000.0).collect();
        let (groups, _) = group_by_bin(&x, &y, &edges);

        for stat in Statistic::ALL {
            let result = binned_statistic(&x, &y, &edges, stat).unwrap();
            let sequential: Vec<f64> = groups.iter().map(|g| stat.reduce(g)).collect();
            assert_eq!(result.values.len(), sequential.len());
            for (par, seq) in result.values.iter().zip(&sequential) {
                assert!(
                    par.to_bits() == seq.to_bits(),
                    "{stat}: parallel {par} vs sequential {seq}"
                );
            }
        }
    }

    proptest! {
        #[test]
        fn prop_median_within_bin_range(
            pairs in prop::collection::vec((0.05f64..1500.0, -5.0f64..5.0), 0..300)
        ) {
            let edges = BinEdges::response_x();
            let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            let result = binned_statistic(&x, &y, &edges, Statistic::Median).unwrap();
            prop_assert_eq!(result.values.len(), edges.bin_count());

            for (bin, value) in result.values.iter().enumerate() {
                let in_bin: Vec<f64> = x
                    .iter()
                    .zip(&y)
                    .filter(|(xv, _)| edges.find_bin(**xv) == Some(bin))
                    .map(|(_, yv)| *yv)
                    .collect();
                if in_bin.is_empty() {
                    prop_assert!(value.is_nan());
                } else {
                    let lo = in_bin.iter().copied().fold(f64::INFINITY, f64::min);
                    let hi = in_bin.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    prop_assert!(*value >= lo && *value <= hi);
                }
            }
        }
    }
}
