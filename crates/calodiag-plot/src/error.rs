//! Error types for calodiag-plot
//!
//! Numeric edge cases (empty bins, zero medians) are never errors; they show
//! up as NaN values in the returned arrays and as gaps in the drawn curves.

use calodiag_stats::StatsError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for plotting operations
#[derive(Error, Debug)]
pub enum PlotError {
    /// Binning or aggregation failed
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    /// Output path has an extension no backend can write
    #[error("Unsupported figure format '{extension}' for {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Raster output was requested but text cannot be rasterised
    #[error("Writing {format} figures needs the `ttf` feature to render text")]
    RasterTextUnavailable { format: &'static str },

    /// The drawing backend reported an error
    #[error("Drawing failed: {message}")]
    Draw { message: String },

    /// Invalid dimensions
    #[error("Invalid dimensions: {width}x{height} (must be positive and within limits)")]
    InvalidDimensions { width: u32, height: u32 },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for plotting operations
pub type PlotResult<T> = Result<T, PlotError>;

/// Wrap a backend error
pub(crate) fn draw_err(err: impl std::fmt::Display) -> PlotError {
    PlotError::Draw {
        message: err.to_string(),
    }
}

/// Validation utilities
pub mod validation {
    use super::*;

    /// Validate figure dimensions
    pub fn validate_dimensions(width: u32, height: u32) -> PlotResult<()> {
        const MAX_DIMENSION: u32 = 16384;
        const MIN_DIMENSION: u32 = 200;

        if width < MIN_DIMENSION
            || height < MIN_DIMENSION
            || width > MAX_DIMENSION
            || height > MAX_DIMENSION
        {
            return Err(PlotError::InvalidDimensions { width, height });
        }
        Ok(())
    }

    /// Validate an axis range
    pub fn validate_range(what: &str, min: f64, max: f64) -> PlotResult<()> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(PlotError::InvalidConfig(format!(
                "{what} range {min}..{max} is empty or not finite"
            )));
        }
        Ok(())
    }
}
