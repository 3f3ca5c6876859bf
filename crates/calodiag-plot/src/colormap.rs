//! Colormaps and colour normalisation
//!
//! Perceptually uniform sequential maps (viridis, plasma, inferno, magma),
//! a diverging map (coolwarm) and a plain grayscale ramp, plus the
//! logarithmic normalisation used for histogram cell colours.

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

/// A color in RGBA format (0.0 to 1.0)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);

    /// Opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// `#RRGGBB`, leading `#` optional
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()? as f32 / 255.0;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()? as f32 / 255.0;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()? as f32 / 255.0;

        Some(Self::rgb(r, g, b))
    }

    /// Parse a basic color name or a hex string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "black" | "k" => Some(Self::BLACK),
            "white" | "w" => Some(Self::WHITE),
            "red" | "r" => Some(Self::RED),
            "green" | "g" => Some(Self::rgb(0.0, 0.5, 0.0)),
            "blue" | "b" => Some(Self::rgb(0.0, 0.0, 1.0)),
            "gray" | "grey" => Some(Self::rgb(0.5, 0.5, 0.5)),
            other => Self::from_hex(other),
        }
    }

    /// Return the same color with a different alpha
    pub fn with_alpha(mut self, a: f32) -> Self {
        self.a = a.clamp(0.0, 1.0);
        self
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: &Color, b: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }

    /// Opaque plotters color (alpha dropped)
    pub fn to_rgb(&self) -> RGBColor {
        RGBColor(
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0.5, 0.5, 0.5)
    }
}

/// Piecewise-linear map from `[0, 1]` to colors
#[derive(Clone, Debug)]
pub struct Colormap {
    /// Name of the colormap
    pub name: String,
    /// Color stops (positions from 0.0 to 1.0)
    stops: Vec<(f32, Color)>,
    /// Whether the colormap is reversed
    reversed: bool,
}

impl Colormap {
    /// Evenly spaced stops
    pub fn from_colors(name: impl Into<String>, colors: Vec<Color>) -> Self {
        let n = colors.len();
        let stops: Vec<(f32, Color)> = colors
            .into_iter()
            .enumerate()
            .map(|(i, c)| (i as f32 / (n - 1).max(1) as f32, c))
            .collect();

        Self {
            name: name.into(),
            stops,
            reversed: false,
        }
    }

    pub fn reversed(mut self) -> Self {
        self.reversed = !self.reversed;
        self
    }

    /// Color at `t`, clamped to `[0, 1]`
    pub fn sample(&self, mut t: f32) -> Color {
        t = t.clamp(0.0, 1.0);
        if self.reversed {
            t = 1.0 - t;
        }

        match self.stops.as_slice() {
            [] => Color::default(),
            [(_, only)] => *only,
            stops => stops
                .windows(2)
                .find(|w| t >= w[0].0 && t <= w[1].0)
                .map(|w| {
                    let (t0, c0) = &w[0];
                    let (t1, c1) = &w[1];
                    Color::lerp(c0, c1, (t - t0) / (t1 - t0))
                })
                .unwrap_or(stops[stops.len() - 1].1),
        }
    }
}

// Built-in maps, resampled from the matplotlib definitions

const VIRIDIS: &[[f32; 3]] = &[
    [0.267, 0.005, 0.329],
    [0.282, 0.141, 0.458],
    [0.254, 0.265, 0.530],
    [0.207, 0.372, 0.553],
    [0.164, 0.471, 0.558],
    [0.128, 0.567, 0.551],
    [0.135, 0.659, 0.518],
    [0.267, 0.749, 0.441],
    [0.478, 0.821, 0.318],
    [0.741, 0.873, 0.150],
    [0.993, 0.906, 0.144],
];

const PLASMA: &[[f32; 3]] = &[
    [0.050, 0.030, 0.528],
    [0.294, 0.012, 0.615],
    [0.494, 0.012, 0.658],
    [0.665, 0.138, 0.614],
    [0.798, 0.280, 0.470],
    [0.898, 0.396, 0.304],
    [0.973, 0.558, 0.154],
    [0.992, 0.748, 0.159],
    [0.940, 0.975, 0.131],
];

const INFERNO: &[[f32; 3]] = &[
    [0.001, 0.000, 0.014],
    [0.133, 0.047, 0.263],
    [0.341, 0.063, 0.429],
    [0.550, 0.161, 0.506],
    [0.735, 0.216, 0.330],
    [0.878, 0.392, 0.102],
    [0.978, 0.557, 0.035],
    [0.992, 0.772, 0.247],
    [0.988, 0.998, 0.645],
];

const MAGMA: &[[f32; 3]] = &[
    [0.001, 0.000, 0.014],
    [0.116, 0.042, 0.232],
    [0.271, 0.051, 0.404],
    [0.461, 0.098, 0.495],
    [0.665, 0.176, 0.515],
    [0.844, 0.295, 0.461],
    [0.962, 0.507, 0.454],
    [0.992, 0.738, 0.600],
    [0.987, 0.991, 0.750],
];

const COOLWARM: &[[f32; 3]] = &[
    [0.230, 0.299, 0.754],
    [0.552, 0.691, 0.996],
    [0.865, 0.865, 0.865],
    [0.957, 0.647, 0.510],
    [0.706, 0.016, 0.150],
];

fn table(name: &str, rows: &[[f32; 3]]) -> Colormap {
    Colormap::from_colors(name, rows.iter().map(|&[r, g, b]| Color::rgb(r, g, b)).collect())
}

/// Perceptually uniform, colorblind-safe; the histogram default
pub fn viridis() -> Colormap {
    table("viridis", VIRIDIS)
}

pub fn plasma() -> Colormap {
    table("plasma", PLASMA)
}

pub fn inferno() -> Colormap {
    table("inferno", INFERNO)
}

pub fn magma() -> Colormap {
    table("magma", MAGMA)
}

/// Diverging blue to red
pub fn coolwarm() -> Colormap {
    table("coolwarm", COOLWARM)
}

/// White to black ramp
pub fn grayscale() -> Colormap {
    Colormap::from_colors("grayscale", vec![Color::WHITE, Color::BLACK])
}

/// Names accepted by [`get_colormap`], without the `_r` variants
pub fn builtin_colormap_names() -> Vec<&'static str> {
    vec!["viridis", "plasma", "inferno", "magma", "coolwarm", "grayscale"]
}

/// Get a built-in colormap by name; a `_r` suffix reverses it
pub fn get_colormap(name: &str) -> Option<Colormap> {
    let lower = name.to_lowercase();
    if let Some(base) = lower.strip_suffix("_r") {
        return get_colormap(base).map(Colormap::reversed);
    }
    match lower.as_str() {
        "viridis" => Some(viridis()),
        "plasma" => Some(plasma()),
        "inferno" => Some(inferno()),
        "magma" => Some(magma()),
        "coolwarm" => Some(coolwarm()),
        "grayscale" | "gray" | "greys" => Some(grayscale()),
        _ => None,
    }
}

/// Logarithmic normalisation of positive values onto `[0, 1]`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogNorm {
    pub vmin: f64,
    pub vmax: f64,
}

impl LogNorm {
    /// Normalisation over `[vmin, vmax]`; widened by a decade when degenerate
    ///
    /// Returns `None` unless both bounds are positive and finite.
    pub fn new(vmin: f64, vmax: f64) -> Option<Self> {
        if !(vmin > 0.0 && vmax > 0.0 && vmin.is_finite() && vmax.is_finite()) {
            return None;
        }
        let (vmin, vmax) = if vmax > vmin { (vmin, vmax) } else { (vmax / 10.0, vmax) };
        Some(Self { vmin, vmax })
    }

    /// Position of `value` in `[0, 1]`, `None` for masked (non-positive or NaN) values
    pub fn normalize(&self, value: f64) -> Option<f32> {
        if value.is_nan() || value <= 0.0 {
            return None;
        }
        let lo = self.vmin.log10();
        let hi = self.vmax.log10();
        Some((((value.log10() - lo) / (hi - lo)) as f32).clamp(0.0, 1.0))
    }

    /// Color of `value`, `None` for masked values
    pub fn color(&self, colormap: &Colormap, value: f64) -> Option<Color> {
        self.normalize(value).map(|t| colormap.sample(t))
    }
}
