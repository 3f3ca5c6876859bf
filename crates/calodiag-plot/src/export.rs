//! Figure and profile export
//!
//! Supports writing figures to:
//! - PNG, BMP, JPEG: raster images via the bitmap backend
//! - SVG: scalable vector graphics
//!
//! and writing returned profiles as CSV.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PlotError, PlotResult};

/// Export format for figures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// PNG raster image
    Png,
    /// Uncompressed bitmap
    Bmp,
    /// JPEG raster image
    Jpeg,
    /// SVG scalable vector graphics
    Svg,
}

impl ExportFormat {
    /// Detect the format from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> PlotResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "png" => Ok(ExportFormat::Png),
            "bmp" => Ok(ExportFormat::Bmp),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            "svg" => Ok(ExportFormat::Svg),
            _ => Err(PlotError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Bmp => "bmp",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Svg => "svg",
        }
    }

    /// Get MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Bmp => "image/bmp",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Svg => "image/svg+xml",
        }
    }

    /// Check if this format is raster (vs vector)
    pub fn is_raster(&self) -> bool {
        !matches!(self, ExportFormat::Svg)
    }
}

/// Canvas settings shared by all figures
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Skip the white background fill (SVG only; raster output is always opaque)
    pub transparent_background: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            transparent_background: false,
        }
    }
}

impl ExportConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Enable transparent background
    pub fn with_transparency(mut self) -> Self {
        self.transparent_background = true;
        self
    }
}

/// Writes `(bin_center, value)` profiles as CSV
#[derive(Clone, Debug)]
pub struct CsvExporter {
    /// Whether to include header row
    pub include_header: bool,

    /// Column delimiter
    pub delimiter: char,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self {
            include_header: true,
            delimiter: ',',
        }
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Generate CSV content; empty bins are written as `nan`
    pub fn export(&self, value_name: &str, centers: &[f64], values: &[f64]) -> PlotResult<String> {
        if centers.len() != values.len() {
            return Err(PlotError::InvalidConfig(format!(
                "{} bin centers but {} values",
                centers.len(),
                values.len()
            )));
        }

        let mut output = String::new();
        if self.include_header {
            output.push_str(&format!("bin_center{}{}\n", self.delimiter, value_name));
        }
        for (center, value) in centers.iter().zip(values) {
            output.push_str(&format!(
                "{}{}{}\n",
                format_value(*center),
                self.delimiter,
                format_value(*value)
            ));
        }
        Ok(output)
    }

    /// Write CSV content to a file
    pub fn write(
        &self,
        path: impl AsRef<Path>,
        value_name: &str,
        centers: &[f64],
        values: &[f64],
    ) -> PlotResult<()> {
        let content = self.export(value_name, centers, values)?;
        std::fs::write(path.as_ref(), content)?;
        tracing::info!(path = %path.as_ref().display(), rows = values.len(), "wrote profile csv");
        Ok(())
    }
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{}", value)
    }
}
