//! Response plots
//!
//! A 2D histogram of observed/reference ratio against the reference energy,
//! normalised to the fraction of all clusters, with a binned profile on top
//! and a dashed line at a response of one.

use std::path::PathBuf;

use calodiag_stats::{binned_statistic, BinEdges, Histogram2d, Statistic, SummaryStats};
use serde::{Deserialize, Serialize};

use crate::axis::AxisConfig;
use crate::colormap::{get_colormap, Color, LogNorm};
use crate::error::{PlotError, PlotResult};
use crate::export::ExportConfig;
use crate::figure::{Colorbar, Figure, HistogramLayer, Layer, LineLayer};
use crate::labels::ExperimentLabel;

/// Extent of the reference line at response 1
const UNITY_LINE: [(f64, f64); 2] = [(0.1, 1.0), (1000.0, 1.0)];

/// Options for [`render_response`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseOptions {
    /// Persist the figure here; skipped when unset or empty
    pub figfile: Option<PathBuf>,
    /// Profile reduction
    pub statistic: Statistic,
    pub xlabel: String,
    pub ylabel: String,
    pub label: ExperimentLabel,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    /// Colormap for the histogram, any name accepted by [`get_colormap`]
    pub colormap: String,
    pub export: ExportConfig,
    /// Open the figure in a viewer after rendering
    pub show: bool,
}

impl Default for ResponseOptions {
    fn default() -> Self {
        Self {
            figfile: None,
            statistic: Statistic::Median,
            xlabel: "Cluster Calib Hits".to_string(),
            ylabel: "Cluster Energy / Calib Hits".to_string(),
            label: ExperimentLabel::default(),
            x_min: 0.1,
            x_max: 1000.0,
            y_min: 0.0,
            y_max: 3.0,
            colormap: "viridis".to_string(),
            export: ExportConfig::default(),
            show: false,
        }
    }
}

impl ResponseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_figfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.figfile = Some(path.into());
        self
    }

    pub fn with_statistic(mut self, statistic: Statistic) -> Self {
        self.statistic = statistic;
        self
    }

    pub fn with_labels(mut self, xlabel: impl Into<String>, ylabel: impl Into<String>) -> Self {
        self.xlabel = xlabel.into();
        self.ylabel = ylabel.into();
        self
    }

    pub fn with_label(mut self, label: ExperimentLabel) -> Self {
        self.label = label;
        self
    }

    pub fn with_x_range(mut self, min: f64, max: f64) -> Self {
        self.x_min = min;
        self.x_max = max;
        self
    }

    pub fn with_y_range(mut self, min: f64, max: f64) -> Self {
        self.y_min = min;
        self.y_max = max;
        self
    }

    pub fn with_colormap(mut self, name: impl Into<String>) -> Self {
        self.colormap = name.into();
        self
    }

    pub fn with_export_config(mut self, export: ExportConfig) -> Self {
        self.export = export;
        self
    }

    pub fn with_show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }
}

/// Result of [`render_response`]
#[derive(Clone, Debug)]
pub struct ResponsePlot {
    /// Midpoints of the reference-energy bins
    pub bin_centers: Vec<f64>,
    /// Profile statistic per bin, NaN where a bin is empty
    pub profile: Vec<f64>,
    /// Summary of all responses, regardless of binning
    pub summary: SummaryStats,
    pub figure: Figure,
}

/// Build the response figure for paired `x` (reference) and `y` (response)
///
/// The figure is written to `options.figfile` when set and shown when
/// `options.show` is set; either way it is returned.
pub fn render_response(x: &[f64], y: &[f64], options: &ResponseOptions) -> PlotResult<ResponsePlot> {
    let x_edges = BinEdges::response_x();
    let y_edges = BinEdges::response_y();

    let profile = binned_statistic(x, y, &x_edges, options.statistic)?;
    let histogram = Histogram2d::fraction_of_total(x, y, &x_edges, &y_edges)?;

    let colormap = get_colormap(&options.colormap)
        .ok_or_else(|| PlotError::InvalidConfig(format!("unknown colormap '{}'", options.colormap)))?;

    let x_axis = AxisConfig::new(options.x_min, options.x_max)
        .with_log_scale()
        .with_label(options.xlabel.clone());
    let y_axis = AxisConfig::new(options.y_min, options.y_max).with_label(options.ylabel.clone());

    let mut figure = Figure::new(x_axis, y_axis)
        .with_export_config(options.export.clone())
        .with_label(options.label.clone());

    match histogram.min_positive().and_then(|min| LogNorm::new(min, histogram.max())) {
        Some(norm) => {
            figure = figure.with_colorbar(Colorbar {
                colormap: colormap.clone(),
                norm,
                label: "Fraction of Clusters".to_string(),
            });
            figure.add_layer(Layer::Histogram(HistogramLayer {
                histogram,
                colormap,
                norm,
            }));
        }
        None => tracing::warn!(points = x.len(), "no clusters inside the response grid"),
    }

    figure.add_layer(Layer::Line(LineLayer::dashed(UNITY_LINE.to_vec(), Color::BLACK)));
    let bin_centers = profile.centers();
    figure.add_layer(Layer::Line(LineLayer::solid(profile.points(), Color::RED)));

    let summary = SummaryStats::from_data(y);
    tracing::debug!(
        statistic = %options.statistic,
        points = x.len(),
        filled_bins = profile.filled_bins(),
        median_response = summary.median,
        "built response figure"
    );

    figure.finish(options.figfile.as_deref(), options.show)?;

    Ok(ResponsePlot {
        bin_centers,
        profile: profile.values,
        summary,
        figure,
    })
}
