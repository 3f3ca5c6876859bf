//! Error types for calodiag-stats

use thiserror::Error;

/// Errors raised while binning or aggregating samples
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Paired sequences have different lengths
    #[error("Length mismatch: {what} has {actual} values, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Bin edges could not be constructed
    #[error("Invalid binning: {message}")]
    InvalidBinning { message: String },

    /// Statistic name not recognised
    #[error("Unknown statistic '{name}' (expected one of: {expected})")]
    UnknownStatistic { name: String, expected: &'static str },
}

/// Result type alias for statistics operations
pub type StatsResult<T> = Result<T, StatsError>;

/// Check that two paired sequences have the same length
pub(crate) fn ensure_same_len(what: &'static str, expected: usize, actual: usize) -> StatsResult<()> {
    if expected != actual {
        return Err(StatsError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}
