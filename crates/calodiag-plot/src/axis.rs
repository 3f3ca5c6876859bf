//! Axis configuration and tick placement
//!
//! Figures are drawn in "plot space": identity for linear axes, `log10` for
//! logarithmic ones. Tick positions are chosen here, in data space, and
//! handed to the backend already transformed through [`AxisCoord`].

use std::ops::Range;

use plotters::coord::ranged1d::{KeyPointHint, NoDefaultFormatting, Ranged, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use serde::{Deserialize, Serialize};

/// Scale type for axis
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    #[default]
    Linear,
    Log10,
}

/// Configuration for an axis
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AxisConfig {
    /// Scale type
    pub scale: ScaleType,

    /// Data range
    pub min: f64,
    pub max: f64,

    /// Label for the axis
    pub label: Option<String>,
}

impl AxisConfig {
    /// Create a new linear axis configuration
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            scale: ScaleType::Linear,
            min,
            max,
            label: None,
        }
    }

    /// Set the axis label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set logarithmic scale
    pub fn with_log_scale(mut self) -> Self {
        self.scale = ScaleType::Log10;
        self
    }

    /// Map a data value into plot space
    ///
    /// Returns `None` for values that cannot be shown on this scale
    /// (non-positive values on a log axis, NaN anywhere).
    pub fn to_plot(&self, value: f64) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        match self.scale {
            ScaleType::Linear => Some(value),
            ScaleType::Log10 if value > 0.0 => Some(value.log10()),
            ScaleType::Log10 => None,
        }
    }

    /// Visible range in plot space
    pub fn plot_range(&self) -> (f64, f64) {
        match self.scale {
            ScaleType::Linear => (self.min, self.max),
            ScaleType::Log10 => (self.min.log10(), self.max.log10()),
        }
    }

    /// Major tick positions in plot space
    ///
    /// Never empty for a valid range: log axes that contain no power of ten
    /// fall back to their minor ticks, or to the range ends.
    pub fn major_ticks(&self) -> Vec<f64> {
        calculate_ticks(self)
            .into_iter()
            .filter(|t| t.is_major)
            .filter_map(|t| self.to_plot(t.value))
            .collect()
    }

    /// Label for a tick given in plot space
    pub fn format_tick(&self, plot_value: f64) -> String {
        match self.scale {
            ScaleType::Linear => format_number(plot_value),
            ScaleType::Log10 if (plot_value - plot_value.round()).abs() < 1e-9 => {
                format!("10{}", superscript(plot_value.round() as i32))
            }
            ScaleType::Log10 => format_number(10f64.powf(plot_value)),
        }
    }
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// Plot-space coordinate for plotters
///
/// Key points are the axis' own major ticks and labels come from
/// [`AxisConfig::format_tick`], so log axes read `10³` rather than `3`.
#[derive(Clone)]
pub struct AxisCoord {
    config: AxisConfig,
    inner: RangedCoordf64,
    ticks: Vec<f64>,
}

impl AxisCoord {
    pub fn new(config: &AxisConfig) -> Self {
        let (lo, hi) = config.plot_range();
        Self {
            config: config.clone(),
            inner: (lo..hi).into(),
            ticks: config.major_ticks(),
        }
    }
}

impl Ranged for AxisCoord {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.inner.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        // Light mesh lines are never drawn
        if hint.weight().allow_light_points() {
            return Vec::new();
        }
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        self.inner.range()
    }
}

impl ValueFormatter<f64> for AxisCoord {
    fn format_ext(&self, value: &f64) -> String {
        self.config.format_tick(*value)
    }
}

/// A tick mark on an axis
#[derive(Clone, Debug)]
pub struct TickMark {
    /// Position in data coordinates
    pub value: f64,

    /// Whether this is a major tick
    pub is_major: bool,
}

/// Calculate tick marks for an axis
pub fn calculate_ticks(config: &AxisConfig) -> Vec<TickMark> {
    match config.scale {
        ScaleType::Linear => calculate_linear_ticks(config),
        ScaleType::Log10 => calculate_log_ticks(config),
    }
}

fn calculate_linear_ticks(config: &AxisConfig) -> Vec<TickMark> {
    let range = config.max - config.min;
    if range <= 0.0 || !range.is_finite() {
        return vec![];
    }

    // Calculate nice tick spacing
    let rough_step = range / 5.0;
    let magnitude = 10.0_f64.powf(rough_step.abs().log10().floor());
    let residual = rough_step / magnitude;

    let nice_step = if residual <= 1.5 {
        1.0 * magnitude
    } else if residual <= 3.0 {
        2.0 * magnitude
    } else if residual <= 7.0 {
        5.0 * magnitude
    } else {
        10.0 * magnitude
    };

    let first = (config.min / nice_step).ceil() as i64;
    let last = (config.max / nice_step + 1e-9).floor() as i64;

    (first..=last)
        .map(|i| TickMark {
            // Snap to the step grid so labels read 0.5, not 0.5000000001
            value: (i as f64 * nice_step * 1e9).round() / 1e9,
            is_major: true,
        })
        .collect()
}

fn calculate_log_ticks(config: &AxisConfig) -> Vec<TickMark> {
    if config.min <= 0.0 || config.max <= config.min || !config.max.is_finite() {
        return vec![];
    }

    // Small tolerance so that 10^-1 computed from 0.1 still counts as a decade
    let lo = config.min * (1.0 - 1e-9);
    let hi = config.max * (1.0 + 1e-9);
    let start_decade = (config.min.log10() - 1e-9).floor() as i32;
    let end_decade = (config.max.log10() + 1e-9).floor() as i32;

    let mut ticks = Vec::new();
    for decade in start_decade..=end_decade {
        let base = 10.0_f64.powi(decade);
        for multiple in 1..=9 {
            let value = base * multiple as f64;
            if value >= lo && value <= hi {
                ticks.push(TickMark {
                    value,
                    is_major: multiple == 1,
                });
            }
        }
    }

    // Less than a decade wide: label what is there
    if !ticks.iter().any(|t| t.is_major) {
        if ticks.is_empty() {
            ticks = vec![config.min, config.max]
                .into_iter()
                .map(|value| TickMark { value, is_major: true })
                .collect();
        } else {
            ticks.iter_mut().for_each(|t| t.is_major = true);
        }
    }

    ticks
}

/// Format a number for display
fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.abs() >= 10000.0 || value.abs() < 0.01 {
        format!("{:.2e}", value)
    } else if value.fract().abs() < 1e-10 {
        format!("{:.0}", value)
    } else {
        let s = format!("{:.3}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Convert an integer to superscript Unicode characters
fn superscript(n: i32) -> String {
    const SUPERSCRIPTS: &[char] = &['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

    if n == 0 {
        return "⁰".to_string();
    }

    let mut result = String::new();
    if n < 0 {
        result.push('⁻');
    }

    let mut num = n.unsigned_abs();
    let mut digits = Vec::new();
    while num > 0 {
        digits.push(SUPERSCRIPTS[(num % 10) as usize]);
        num /= 10;
    }
    result.extend(digits.into_iter().rev());
    result
}
