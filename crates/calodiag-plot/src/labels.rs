//! Experiment labels drawn inside the plotting area
//!
//! A label block is a bold experiment name followed by a status
//! (`"ATLAS Simulation Internal"`), an optional description line and any
//! number of extra text lines, stacked downwards from an anchor given in
//! axes-fraction coordinates.

use serde::{Deserialize, Serialize};

use crate::colormap::Color;
use crate::error::{PlotError, PlotResult};

/// Anchor used when a coordinate is negative
pub const DEFAULT_LABEL_X: f64 = 0.05;
pub const DEFAULT_LABEL_Y: f64 = 0.95;

/// Optional box drawn behind a label block
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelBox {
    /// Fill color name or hex
    pub fill: String,
    /// Fill opacity, 0 to 1
    pub alpha: f64,
    /// Border color; no border when unset
    pub border: Option<String>,
}

impl Default for LabelBox {
    fn default() -> Self {
        Self {
            fill: "white".to_string(),
            alpha: 0.8,
            border: None,
        }
    }
}

/// Experiment badge, description and free text
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentLabel {
    /// Anchor x in axes fraction; negative selects the default
    pub x: f64,
    /// Anchor y in axes fraction; negative selects the default
    pub y: f64,
    /// Insert "Simulation" between experiment name and status
    pub simulation: bool,
    /// Experiment name, drawn bold
    pub experiment: String,
    /// Status text such as "Internal" or "Preliminary"
    pub status: String,
    /// Text color name or hex
    pub color: String,
    /// Line below the badge; skipped when empty
    pub description: String,
    /// Extra lines below the description
    pub text_lines: Vec<String>,
    /// Box behind the block
    pub bbox: Option<LabelBox>,
    /// Font size in pixels
    pub font_size: u32,
}

impl Default for ExperimentLabel {
    fn default() -> Self {
        Self {
            x: -1.0,
            y: -1.0,
            simulation: false,
            experiment: "ATLAS".to_string(),
            status: "Internal".to_string(),
            color: "black".to_string(),
            description: String::new(),
            text_lines: Vec::new(),
            bbox: None,
            font_size: 18,
        }
    }
}

impl ExperimentLabel {
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_simulation(mut self, simulation: bool) -> Self {
        self.simulation = simulation;
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_text_lines(mut self, lines: Vec<String>) -> Self {
        self.text_lines = lines;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_bbox(mut self, bbox: LabelBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Anchor in axes fraction after applying defaults
    pub fn anchor(&self) -> (f64, f64) {
        let x = if self.x < 0.0 { DEFAULT_LABEL_X } else { self.x };
        let y = if self.y < 0.0 { DEFAULT_LABEL_Y } else { self.y };
        (x, y)
    }

    /// Status part of the badge line, e.g. "Simulation Internal"
    pub fn status_text(&self) -> String {
        match (self.simulation, self.status.is_empty()) {
            (true, true) => "Simulation".to_string(),
            (true, false) => format!("Simulation {}", self.status),
            (false, _) => self.status.clone(),
        }
    }

    /// Lines below the badge, in drawing order
    pub fn body_lines(&self) -> Vec<&str> {
        std::iter::once(self.description.as_str())
            .filter(|d| !d.is_empty())
            .chain(self.text_lines.iter().map(String::as_str))
            .collect()
    }

    /// Total number of text lines including the badge
    pub fn line_count(&self) -> usize {
        1 + self.body_lines().len()
    }

    /// Resolved text color
    pub fn text_color(&self) -> PlotResult<Color> {
        parse_color(&self.color)
    }

    /// Resolved box fill and border colors
    pub fn box_colors(&self) -> PlotResult<Option<(Color, Option<Color>)>> {
        let Some(bbox) = &self.bbox else {
            return Ok(None);
        };
        let fill = parse_color(&bbox.fill)?.with_alpha(bbox.alpha as f32);
        let border = bbox.border.as_deref().map(parse_color).transpose()?;
        Ok(Some((fill, border)))
    }
}

fn parse_color(name: &str) -> PlotResult<Color> {
    Color::parse(name).ok_or_else(|| PlotError::InvalidConfig(format!("unknown color '{name}'")))
}
