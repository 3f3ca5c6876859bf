//! calodiag-stats - Binned statistics for calorimeter cluster studies
//!
//! This crate provides the numeric half of the calorimeter diagnostics:
//!
//! - **BinEdges**: fixed, data-independent log and linear binnings
//! - **Statistic**: per-bin reductions (median, std, std/mean, IQR/median, ...)
//! - **binned_statistic**: reduce paired samples into one value per bin
//! - **Histogram2d**: weighted 2D histograms normalised to a fraction of all points
//!
//! Numeric edge cases (empty bins, zero means or medians) surface as NaN or
//! Inf values, never as errors.

pub mod binned;
pub mod binning;
pub mod error;
pub mod histogram;
pub mod statistic;
pub mod summary;

pub use binned::*;
pub use binning::*;
pub use error::*;
pub use histogram::*;
pub use statistic::*;
pub use summary::*;
