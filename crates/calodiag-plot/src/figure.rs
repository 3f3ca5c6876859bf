//! Owned figure descriptions and their rendering
//!
//! A [`Figure`] is a plain value: axes, an ordered list of layers, an
//! optional colourbar and an optional experiment label. Nothing is drawn
//! until the figure is saved, so renderers can build one, hand it back to the
//! caller and let the caller decide where it goes.
//!
//! Drawing happens in plot space (see [`crate::axis`]): log axes are mapped
//! through `log10` before reaching the backend.

use std::path::{Path, PathBuf};

use calodiag_stats::Histogram2d;
use plotters::coord::Shift;
#[cfg(feature = "ttf")]
use plotters::prelude::BitMapBackend;
use plotters::prelude::{
    Cartesian2d, ChartBuilder, ChartContext, Circle, DrawingArea, DrawingBackend, FontStyle,
    IntoDrawingArea, IntoFont, LineSeries, PathElement, RGBAColor, Rectangle, SVGBackend,
    ShapeStyle, Text,
};
use plotters::style::Color as _;

use crate::axis::{AxisConfig, AxisCoord};
use crate::colormap::{Color, Colormap, LogNorm};
use crate::error::{draw_err, validation, PlotResult};
use crate::export::{ExportConfig, ExportFormat};
use crate::labels::ExperimentLabel;

type PlotCoord = Cartesian2d<AxisCoord, AxisCoord>;

const FONT: &str = "sans-serif";
const COLORBAR_WIDTH: i32 = 140;
const COLORBAR_STEPS: usize = 64;
const MAX_TICK_LABELS: usize = 32;
/// Dash and gap length as a fraction of the axes diagonal
const DASH_LENGTH: f64 = 0.015;
const DASH_GAP: f64 = 0.01;

/// Weighted 2D histogram drawn as coloured cells
#[derive(Clone, Debug)]
pub struct HistogramLayer {
    pub histogram: Histogram2d,
    pub colormap: Colormap,
    pub norm: LogNorm,
}

/// Polyline through data points
///
/// NaN points split the line; isolated finite points get a small marker.
#[derive(Clone, Debug)]
pub struct LineLayer {
    pub points: Vec<(f64, f64)>,
    pub color: Color,
    pub width: u32,
    pub dashed: bool,
}

impl LineLayer {
    pub fn solid(points: Vec<(f64, f64)>, color: Color) -> Self {
        Self {
            points,
            color,
            width: 2,
            dashed: false,
        }
    }

    pub fn dashed(points: Vec<(f64, f64)>, color: Color) -> Self {
        Self {
            dashed: true,
            ..Self::solid(points, color)
        }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }
}

#[derive(Clone, Debug)]
pub enum Layer {
    Histogram(HistogramLayer),
    Line(LineLayer),
}

/// Colour scale shown to the right of the axes
#[derive(Clone, Debug)]
pub struct Colorbar {
    pub colormap: Colormap,
    pub norm: LogNorm,
    pub label: String,
}

/// A complete plot, ready to be saved or shown
#[derive(Clone, Debug)]
pub struct Figure {
    pub export: ExportConfig,
    pub x_axis: AxisConfig,
    pub y_axis: AxisConfig,
    layers: Vec<Layer>,
    colorbar: Option<Colorbar>,
    label: Option<ExperimentLabel>,
}

impl Figure {
    pub fn new(x_axis: AxisConfig, y_axis: AxisConfig) -> Self {
        Self {
            export: ExportConfig::default(),
            x_axis,
            y_axis,
            layers: Vec::new(),
            colorbar: None,
            label: None,
        }
    }

    pub fn with_export_config(mut self, export: ExportConfig) -> Self {
        self.export = export;
        self
    }

    pub fn with_label(mut self, label: ExperimentLabel) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_colorbar(mut self, colorbar: Colorbar) -> Self {
        self.colorbar = Some(colorbar);
        self
    }

    /// Append a layer; later layers draw on top
    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn colorbar(&self) -> Option<&Colorbar> {
        self.colorbar.as_ref()
    }

    /// Write the figure to `path`, format chosen by extension
    ///
    /// Raster formats need the `ttf` feature; without it they fail with
    /// [`PlotError::RasterTextUnavailable`](crate::PlotError::RasterTextUnavailable)
    /// before anything is written.
    pub fn render_to(&self, path: impl AsRef<Path>) -> PlotResult<()> {
        let path = path.as_ref();
        let format = ExportFormat::from_path(path)?;
        let ExportConfig { width, height, .. } = self.export;
        validation::validate_dimensions(width, height)?;

        match format {
            ExportFormat::Svg => {
                let root = SVGBackend::new(path, (width, height)).into_drawing_area();
                self.draw(&root, !self.export.transparent_background)?;
                root.present().map_err(draw_err)?;
            }
            ExportFormat::Png | ExportFormat::Bmp | ExportFormat::Jpeg => {
                self.render_bitmap(path, format, (width, height))?
            }
        }

        tracing::info!(path = %path.display(), format = format.extension(), "saved figure");
        Ok(())
    }

    #[cfg(feature = "ttf")]
    fn render_bitmap(&self, path: &Path, _format: ExportFormat, size: (u32, u32)) -> PlotResult<()> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        self.draw(&root, true)?;
        root.present().map_err(draw_err)
    }

    /// The built-in plotters font can lay text out but not rasterise it
    #[cfg(not(feature = "ttf"))]
    fn render_bitmap(&self, _path: &Path, format: ExportFormat, _size: (u32, u32)) -> PlotResult<()> {
        Err(crate::error::PlotError::RasterTextUnavailable {
            format: format.extension(),
        })
    }

    /// Render the figure as an SVG document
    pub fn to_svg_string(&self) -> PlotResult<String> {
        let ExportConfig { width, height, .. } = self.export;
        validation::validate_dimensions(width, height)?;

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
            self.draw(&root, !self.export.transparent_background)?;
            root.present().map_err(draw_err)?;
        }
        Ok(svg)
    }

    /// Open the figure in the platform viewer
    ///
    /// The figure is written as `calodiag-<uuid>.svg` in the temp directory
    /// and that path is returned. The file is left in place because the
    /// viewer reads it after this returns; removing it is up to the caller.
    /// Use [`Figure::show_at`] to choose the location instead. Failing to
    /// launch a viewer (headless machines) is logged and otherwise ignored.
    pub fn show(&self) -> PlotResult<PathBuf> {
        let path = std::env::temp_dir().join(format!("calodiag-{}.svg", uuid::Uuid::new_v4()));
        self.show_at(&path)?;
        Ok(path)
    }

    /// Write the figure to `path` and open it in the platform viewer
    pub fn show_at(&self, path: impl AsRef<Path>) -> PlotResult<()> {
        let path = path.as_ref();
        self.render_to(path)?;
        if let Err(err) = open::that(path) {
            tracing::warn!(path = %path.display(), error = %err, "could not open figure viewer");
        }
        Ok(())
    }

    /// Persist to `figfile` when it is set and non-empty, then show if asked
    pub(crate) fn finish(&self, figfile: Option<&Path>, show: bool) -> PlotResult<()> {
        if let Some(path) = figfile.filter(|p| !p.as_os_str().is_empty()) {
            self.render_to(path)?;
        }
        if show {
            self.show()?;
        }
        Ok(())
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, fill: bool) -> PlotResult<()> {
        let (x_lo, x_hi) = self.x_axis.plot_range();
        let (y_lo, y_hi) = self.y_axis.plot_range();
        validation::validate_range("x axis", x_lo, x_hi)?;
        validation::validate_range("y axis", y_lo, y_hi)?;

        if fill {
            root.fill(&plotters::style::WHITE).map_err(draw_err)?;
        }

        let main = match &self.colorbar {
            Some(colorbar) => {
                let (main, side) = root.split_horizontally(self.export.width as i32 - COLORBAR_WIDTH);
                draw_colorbar(&side, colorbar)?;
                main
            }
            None => root.clone(),
        };

        let mut chart = ChartBuilder::on(&main)
            .margin(15)
            .x_label_area_size(55)
            .y_label_area_size(70)
            .build_cartesian_2d(AxisCoord::new(&self.x_axis), AxisCoord::new(&self.y_axis))
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(MAX_TICK_LABELS)
            .y_labels(MAX_TICK_LABELS)
            .x_desc(self.x_axis.label.clone().unwrap_or_default())
            .y_desc(self.y_axis.label.clone().unwrap_or_default())
            .label_style((FONT, 15))
            .axis_desc_style((FONT, 18))
            .draw()
            .map_err(draw_err)?;

        for layer in &self.layers {
            match layer {
                Layer::Histogram(hist) => self.draw_histogram(&mut chart, hist)?,
                Layer::Line(line) => self.draw_line(&mut chart, line)?,
            }
        }

        if let Some(label) = &self.label {
            self.draw_label(&mut chart, label)?;
        }
        Ok(())
    }

    fn draw_histogram<DB: DrawingBackend>(
        &self,
        chart: &mut ChartContext<'_, DB, PlotCoord>,
        layer: &HistogramLayer,
    ) -> PlotResult<()> {
        let hist = &layer.histogram;
        let x_edges = hist.x_edges().edges();
        let y_edges = hist.y_edges().edges();

        let cells: Vec<_> = hist
            .filled_cells()
            .filter_map(|(ix, iy, value)| {
                let color = layer.norm.color(&layer.colormap, value)?;
                let (x0, x1) = clip_span(&self.x_axis, x_edges[ix], x_edges[ix + 1])?;
                let (y0, y1) = clip_span(&self.y_axis, y_edges[iy], y_edges[iy + 1])?;
                Some(Rectangle::new([(x0, y0), (x1, y1)], color.to_rgb().filled()))
            })
            .collect();

        chart.draw_series(cells).map_err(draw_err)?;
        Ok(())
    }

    fn draw_line<DB: DrawingBackend>(
        &self,
        chart: &mut ChartContext<'_, DB, PlotCoord>,
        layer: &LineLayer,
    ) -> PlotResult<()> {
        let style = ShapeStyle::from(&layer.color.to_rgb()).stroke_width(layer.width);
        let spans = (plot_span(&self.x_axis), plot_span(&self.y_axis));

        for segment in finite_segments(&self.x_axis, &self.y_axis, &layer.points) {
            if let [point] = segment.as_slice() {
                chart
                    .draw_series(std::iter::once(Circle::new(*point, layer.width + 1, style.filled())))
                    .map_err(draw_err)?;
            } else if layer.dashed {
                let dashes = dash_segments(&segment, spans, DASH_LENGTH, DASH_GAP);
                chart
                    .draw_series(dashes.into_iter().map(|dash| PathElement::new(dash, style)))
                    .map_err(draw_err)?;
            } else {
                chart
                    .draw_series(LineSeries::new(segment, style))
                    .map_err(draw_err)?;
            }
        }
        Ok(())
    }

    fn draw_label<DB: DrawingBackend>(
        &self,
        chart: &mut ChartContext<'_, DB, PlotCoord>,
        label: &ExperimentLabel,
    ) -> PlotResult<()> {
        let color = label.text_color()?.to_rgb();
        let (x_lo, x_hi) = self.x_axis.plot_range();
        let (y_lo, y_hi) = self.y_axis.plot_range();
        let (width_px, height_px) = chart.plotting_area().dim_in_pixel();

        // Data units per pixel
        let unit_x = (x_hi - x_lo) / width_px.max(1) as f64;
        let unit_y = (y_hi - y_lo) / height_px.max(1) as f64;
        let size = label.font_size as f64;
        let char_width = size * 0.6 * unit_x;
        let line_step = size * 1.35 * unit_y;

        let (fx, fy) = label.anchor();
        let x0 = x_lo + fx * (x_hi - x_lo);
        let y0 = y_lo + fy * (y_hi - y_lo);

        let status = label.status_text();
        let body = label.body_lines();

        if let Some((fill, border)) = label.box_colors()? {
            let badge_chars = label.experiment.chars().count() + 1 + status.chars().count();
            let widest = body
                .iter()
                .map(|line| line.chars().count())
                .chain(std::iter::once(badge_chars))
                .max()
                .unwrap_or(0);
            let pad_x = 6.0 * unit_x;
            let pad_y = 6.0 * unit_y;
            let corners = [
                (x0 - pad_x, y0 + pad_y),
                (
                    x0 + widest as f64 * char_width + pad_x,
                    y0 - line_step * label.line_count() as f64 - pad_y,
                ),
            ];
            let rgb = fill.to_rgb();
            let fill_color = RGBAColor(rgb.0, rgb.1, rgb.2, fill.a as f64);
            chart
                .draw_series(std::iter::once(Rectangle::new(corners, fill_color.filled())))
                .map_err(draw_err)?;
            if let Some(border) = border {
                let border_style = ShapeStyle::from(&border.to_rgb()).stroke_width(1);
                chart
                    .draw_series(std::iter::once(Rectangle::new(corners, border_style)))
                    .map_err(draw_err)?;
            }
        }

        let bold = (FONT, size).into_font().style(FontStyle::Bold).color(&color);
        let normal = (FONT, size).into_font().color(&color);

        let status_x = x0 + (label.experiment.chars().count() + 1) as f64 * char_width;
        let mut texts = vec![
            Text::new(label.experiment.clone(), (x0, y0), bold),
            Text::new(status, (status_x, y0), normal.clone()),
        ];
        for (i, line) in body.iter().enumerate() {
            let y = y0 - line_step * (i + 1) as f64;
            texts.push(Text::new(line.to_string(), (x0, y), normal.clone()));
        }

        chart.draw_series(texts).map_err(draw_err)?;
        Ok(())
    }
}

fn draw_colorbar<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, colorbar: &Colorbar) -> PlotResult<()> {
    let axis = AxisConfig::new(colorbar.norm.vmin, colorbar.norm.vmax).with_log_scale();
    let (lo, hi) = axis.plot_range();

    let mut chart = ChartBuilder::on(area)
        .margin_top(15)
        .margin_bottom(70)
        .margin_left(5)
        .margin_right(5)
        .right_y_label_area_size(95)
        .build_cartesian_2d(AxisCoord::new(&AxisConfig::new(0.0, 1.0)), AxisCoord::new(&axis))
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(MAX_TICK_LABELS)
        .y_desc(colorbar.label.clone())
        .label_style((FONT, 14))
        .axis_desc_style((FONT, 16))
        .draw()
        .map_err(draw_err)?;

    let step = (hi - lo) / COLORBAR_STEPS as f64;
    chart
        .draw_series((0..COLORBAR_STEPS).map(|i| {
            let y0 = lo + i as f64 * step;
            let t = (i as f32 + 0.5) / COLORBAR_STEPS as f32;
            Rectangle::new([(0.0, y0), (1.0, y0 + step)], colorbar.colormap.sample(t).to_rgb().filled())
        }))
        .map_err(draw_err)?;
    Ok(())
}

fn plot_span(axis: &AxisConfig) -> f64 {
    let (lo, hi) = axis.plot_range();
    hi - lo
}

/// Map `[a, b]` into plot space and clamp it to the visible range
fn clip_span(axis: &AxisConfig, a: f64, b: f64) -> Option<(f64, f64)> {
    let (lo, hi) = axis.plot_range();
    let a = axis.to_plot(a)?.max(lo);
    let b = axis.to_plot(b)?.min(hi);
    (b > a).then_some((a, b))
}

/// Split points into runs that can be drawn, in plot space
fn finite_segments(x_axis: &AxisConfig, y_axis: &AxisConfig, points: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for &(x, y) in points {
        match (x_axis.to_plot(x), y_axis.to_plot(y)) {
            (Some(px), Some(py)) if px.is_finite() && py.is_finite() => current.push((px, py)),
            _ => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Cut a polyline into dashes
///
/// Lengths are measured in axes fractions (`spans` are the plot-space
/// extents of the two axes) so dashes look the same on any scale.
fn dash_segments(points: &[(f64, f64)], spans: (f64, f64), dash: f64, gap: f64) -> Vec<Vec<(f64, f64)>> {
    let mut dashes = Vec::new();
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let length = (((b.0 - a.0) / spans.0).powi(2) + ((b.1 - a.1) / spans.1).powi(2)).sqrt();
        if length <= 0.0 || !length.is_finite() {
            continue;
        }
        let at = |s: f64| (a.0 + (b.0 - a.0) * s / length, a.1 + (b.1 - a.1) * s / length);
        let count = (length / (dash + gap)).ceil() as usize;
        for k in 0..count {
            let start = k as f64 * (dash + gap);
            let end = (start + dash).min(length);
            dashes.push(vec![at(start), at(end)]);
        }
    }
    dashes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_x() -> AxisConfig {
        AxisConfig::new(0.1, 1000.0).with_log_scale()
    }

    #[test]
    fn test_finite_segments_split_on_nan() {
        let points = vec![
            (1.0, 1.0),
            (2.0, f64::NAN),
            (3.0, 1.0),
            (4.0, 1.1),
            (-1.0, 1.0),
            (5.0, 0.9),
        ];
        let segments = finite_segments(&log_x(), &AxisConfig::new(0.0, 3.0), &points);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].len(), 1);
        assert_eq!(segments[1].len(), 2);
        assert_eq!(segments[2].len(), 1);
        assert!((segments[1][0].0 - 3f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn test_clip_span() {
        let axis = AxisConfig::new(0.0, 3.0);
        assert_eq!(clip_span(&axis, 1.0, 2.0), Some((1.0, 2.0)));
        assert_eq!(clip_span(&axis, 2.5, 4.0), Some((2.5, 3.0)));
        assert_eq!(clip_span(&axis, 3.5, 4.0), None);
        assert_eq!(clip_span(&log_x(), -1.0, 0.5), None);
    }

    #[test]
    fn test_dash_segments_cover_line() {
        let points = [(0.0, 1.0), (4.0, 1.0)];
        let dashes = dash_segments(&points, (4.0, 3.0), 0.125, 0.125);
        assert_eq!(dashes.len(), 4);
        assert_eq!(dashes[0], vec![(0.0, 1.0), (0.5, 1.0)]);
        let last = dashes.last().unwrap();
        assert!(last[1].0 <= 4.0 + 1e-12);
    }

    #[test]
    fn test_line_layer_constructors() {
        let dashed = LineLayer::dashed(vec![(0.1, 1.0), (1000.0, 1.0)], Color::BLACK).with_width(1);
        assert!(dashed.dashed);
        assert_eq!(dashed.width, 1);
        assert!(!LineLayer::solid(vec![], Color::RED).dashed);
    }

    /// How plotters writes a text element's content
    fn text_node(text: &str) -> String {
        format!(">{text}\n</text>")
    }

    #[test]
    fn test_svg_log_x_linear_y() {
        let mut figure = Figure::new(
            log_x().with_label("Cluster Calib Hits"),
            AxisConfig::new(0.0, 2.0).with_label("Resolution"),
        );
        figure.add_layer(Layer::Line(LineLayer::solid(
            vec![(1.0, 0.5), (10.0, f64::NAN), (100.0, 0.3), (200.0, 0.2)],
            Color::RED,
        )));
        let svg = figure.to_svg_string().unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(&text_node("Cluster Calib Hits")));
        assert!(svg.contains(&text_node("Resolution")));
        assert!(svg.contains(&text_node("10¹")));
        assert!(svg.contains(&text_node("10²")));
        assert!(svg.contains(&text_node("0.5")));
        assert!(svg.contains(&text_node("1.5")));
    }

    #[test]
    fn test_svg_linear_x_log_y_with_colorbar() {
        let colormap = crate::colormap::get_colormap("viridis").unwrap();
        let figure = Figure::new(
            AxisConfig::new(0.0, 3.0),
            AxisConfig::new(0.01, 10.0).with_log_scale(),
        )
        .with_colorbar(Colorbar {
            colormap,
            norm: LogNorm::new(2.0, 5.0).unwrap(),
            label: "Fraction of Clusters".to_string(),
        });
        let svg = figure.to_svg_string().unwrap();
        assert!(svg.contains(&text_node("1.5")));
        assert!(svg.contains(&text_node("10⁻¹")));
        assert!(svg.contains(&text_node("10⁰")));
        // Colourbar narrower than a decade still gets labels
        assert!(svg.contains(&text_node("4")));
        assert!(svg.contains(&text_node("Fraction of Clusters")));
    }

    #[test]
    fn test_svg_partial_decade_axis_has_labels() {
        let figure = Figure::new(
            AxisConfig::new(2.0, 50.0).with_log_scale(),
            AxisConfig::new(0.0, 3.0),
        );
        let svg = figure.to_svg_string().unwrap();
        assert!(svg.contains(&text_node("10¹")));

        let narrow = Figure::new(AxisConfig::new(2.0, 5.0).with_log_scale(), AxisConfig::new(0.0, 3.0));
        let svg = narrow.to_svg_string().unwrap();
        assert!(svg.contains(&text_node("4")));
    }

    #[test]
    fn test_finish_skips_empty_figfile() {
        let dir = tempfile::tempdir().unwrap();
        let figure = Figure::new(log_x(), AxisConfig::new(0.0, 3.0));
        figure.finish(Some(Path::new("")), false).unwrap();
        figure.finish(None, false).unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        let path = dir.path().join("figure.svg");
        figure.finish(Some(&path), false).unwrap();
        assert!(path.exists());
    }

    #[cfg(not(feature = "ttf"))]
    #[test]
    fn test_raster_needs_ttf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figure.png");
        let figure = Figure::new(log_x(), AxisConfig::new(0.0, 3.0));
        let err = figure.render_to(&path).unwrap_err();
        assert!(matches!(
            err,
            crate::error::PlotError::RasterTextUnavailable { format: "png" }
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_invalid_log_range_is_rejected() {
        let figure = Figure::new(AxisConfig::new(0.0, 10.0).with_log_scale(), AxisConfig::new(0.0, 1.0));
        assert!(figure.to_svg_string().is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let figure = Figure::new(log_x(), AxisConfig::new(0.0, 1.0));
        let dir = tempfile::tempdir().unwrap();
        assert!(figure.render_to(dir.path().join("figure.pdf")).is_err());
    }
}
