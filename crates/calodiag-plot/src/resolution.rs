//! Resolution curves
//!
//! The spread of the response in each reference-energy bin, drawn as a single
//! line on fixed axes.

use std::path::PathBuf;

use calodiag_stats::{binned_statistic, BinEdges, ResolutionStatistic};
use serde::{Deserialize, Serialize};

use crate::axis::AxisConfig;
use crate::colormap::Color;
use crate::error::PlotResult;
use crate::export::ExportConfig;
use crate::figure::{Figure, Layer, LineLayer};
use crate::labels::ExperimentLabel;

const X_RANGE: (f64, f64) = (0.1, 1000.0);
const Y_RANGE: (f64, f64) = (0.0, 2.0);
const LINE_COLOR: Color = Color::rgb(0.122, 0.467, 0.706);

/// Options for [`render_resolution`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionOptions {
    /// Persist the figure here; skipped when unset or empty
    pub figfile: Option<PathBuf>,
    /// Dispersion measure per bin
    pub statistic: ResolutionStatistic,
    pub xlabel: String,
    pub ylabel: String,
    pub label: ExperimentLabel,
    pub export: ExportConfig,
    /// Open the figure in a viewer after rendering
    pub show: bool,
}

impl Default for ResolutionOptions {
    fn default() -> Self {
        Self {
            figfile: None,
            statistic: ResolutionStatistic::Std,
            xlabel: "Cluster Calib Hits".to_string(),
            ylabel: "Energy IQR over Median".to_string(),
            label: ExperimentLabel::default(),
            export: ExportConfig::default(),
            show: false,
        }
    }
}

impl ResolutionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_figfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.figfile = Some(path.into());
        self
    }

    pub fn with_statistic(mut self, statistic: ResolutionStatistic) -> Self {
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

    pub fn with_export_config(mut self, export: ExportConfig) -> Self {
        self.export = export;
        self
    }

    pub fn with_show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }
}

/// Result of [`render_resolution`]
#[derive(Clone, Debug)]
pub struct ResolutionPlot {
    pub bin_centers: Vec<f64>,
    /// Resolution per bin, NaN where a bin is empty
    pub resolution: Vec<f64>,
    pub figure: Figure,
}

/// Build the resolution curve for paired `x` (reference) and `y` (response)
pub fn render_resolution(
    x: &[f64],
    y: &[f64],
    options: &ResolutionOptions,
) -> PlotResult<ResolutionPlot> {
    let edges = BinEdges::response_x();
    let resolution = binned_statistic(x, y, &edges, options.statistic.into())?;

    let x_axis = AxisConfig::new(X_RANGE.0, X_RANGE.1)
        .with_log_scale()
        .with_label(options.xlabel.clone());
    let y_axis = AxisConfig::new(Y_RANGE.0, Y_RANGE.1).with_label(options.ylabel.clone());

    let mut figure = Figure::new(x_axis, y_axis)
        .with_export_config(options.export.clone())
        .with_label(options.label.clone());
    figure.add_layer(Layer::Line(LineLayer::solid(resolution.points(), LINE_COLOR)));

    tracing::debug!(
        statistic = %options.statistic,
        points = x.len(),
        filled_bins = resolution.filled_bins(),
        "built resolution figure"
    );

    figure.finish(options.figfile.as_deref(), options.show)?;

    Ok(ResolutionPlot {
        bin_centers: resolution.centers(),
        resolution: resolution.values,
        figure,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use calodiag_stats::{iqr_over_median, std_dev, std_over_mean};
    use rstest::rstest;

    /// Two populated bins with different spreads
    fn two_bin_sample() -> (Vec<f64>, Vec<f64>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..200 {
            x.push(2.0);
            y.push(0.9 + 0.2 * i as f64 / 199.0);
            x.push(200.0);
            y.push(0.95 + 0.1 * i as f64 / 199.0);
        }
        (x, y)
    }

    fn bin_values(x: &[f64], y: &[f64], at: f64) -> Vec<f64> {
        x.iter()
            .zip(y)
            .filter(|&(&xv, _)| xv == at)
            .map(|(_, &yv)| yv)
            .collect()
    }

    #[rstest]
    #[case(ResolutionStatistic::Std)]
    #[case(ResolutionStatistic::StdOverMean)]
    #[case(ResolutionStatistic::IqrOverMed)]
    fn test_resolution_matches_reduction(#[case] statistic: ResolutionStatistic) {
        let (x, y) = two_bin_sample();
        let options = ResolutionOptions::default().with_statistic(statistic);
        let plot = render_resolution(&x, &y, &options).unwrap();

        assert_eq!(plot.bin_centers.len(), 40);
        let edges = BinEdges::response_x();
        for at in [2.0, 200.0] {
            let values = bin_values(&x, &y, at);
            let expected = match statistic {
                ResolutionStatistic::Std => std_dev(&values),
                ResolutionStatistic::StdOverMean => std_over_mean(&values),
                ResolutionStatistic::IqrOverMed => iqr_over_median(&values),
            };
            let bin = edges.find_bin(at).unwrap();
            assert!((plot.resolution[bin] - expected).abs() < 1e-12);
        }
        let filled = plot.resolution.iter().filter(|v| !v.is_nan()).count();
        assert_eq!(filled, 2);
    }

    #[test]
    fn test_wider_bin_has_larger_resolution() {
        let (x, y) = two_bin_sample();
        let plot = render_resolution(&x, &y, &ResolutionOptions::default()).unwrap();
        let edges = BinEdges::response_x();
        let low = plot.resolution[edges.find_bin(2.0).unwrap()];
        let high = plot.resolution[edges.find_bin(200.0).unwrap()];
        assert!(low > high);
    }

    #[test]
    fn test_fixed_axes() {
        let plot = render_resolution(&[], &[], &ResolutionOptions::default()).unwrap();
        assert_eq!((plot.figure.x_axis.min, plot.figure.x_axis.max), X_RANGE);
        assert_eq!((plot.figure.y_axis.min, plot.figure.y_axis.max), Y_RANGE);
        assert_eq!(plot.figure.y_axis.label.as_deref(), Some("Energy IQR over Median"));
        assert_eq!(plot.figure.layers().len(), 1);
        assert!(plot.figure.colorbar().is_none());
    }

    #[test]
    fn test_unknown_statistic_rejected_when_deserializing() {
        let result: Result<ResolutionOptions, _> = serde_json::from_str(r#"{"statistic": "median"}"#);
        assert!(result.is_err());

        let options: ResolutionOptions =
            serde_json::from_str(r#"{"statistic": "stdOverMean"}"#).unwrap();
        assert_eq!(options.statistic, ResolutionStatistic::StdOverMean);
    }
}
