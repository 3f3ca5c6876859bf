//! calodiag-plot - Response and resolution figures for calorimeter clusters
//!
//! This crate turns paired cluster samples into the two standard calibration
//! diagnostics:
//!
//! - **render_response**: 2D response histogram with a binned profile and a
//!   reference line at one
//! - **render_resolution**: per-bin spread of the response as a single curve
//!
//! # Figures
//!
//! Every call builds a fresh, owned [`Figure`] and returns it. There is no
//! global drawing state, so figures can be built on any thread, saved again
//! with [`Figure::render_to`] (PNG, BMP, JPEG or SVG by extension) or opened
//! with [`Figure::show`].
//!
//! SVG output always works. Raster output needs the `ttf` feature, which
//! rasterises text with system fonts; without it saving to a raster format
//! returns [`PlotError::RasterTextUnavailable`].

pub mod axis;
pub mod colormap;
pub mod error;
pub mod export;
pub mod figure;
pub mod labels;
pub mod response;
pub mod resolution;

pub use axis::*;
pub use colormap::*;
pub use error::*;
pub use export::*;
pub use figure::*;
pub use labels::*;
pub use resolution::*;
pub use response::*;

pub use calodiag_stats::{ResolutionStatistic, Statistic};
