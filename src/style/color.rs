//! Color handling
//! Parses color specs from plot data and maps numeric values through colormaps.

use crate::error::{PlotError, Result};
use plotters::style::{RGBAColor, RGBColor};
use serde_json::Value;

/// An RGBA color with float channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

pub const BLACK: PlotColor = PlotColor::rgb(0.0, 0.0, 0.0);
pub const WHITE: PlotColor = PlotColor::rgb(1.0, 1.0, 1.0);

/// Default color cycle for simulation figures (populations, traces, histograms).
pub const SIM_PALETTE: [PlotColor; 15] = [
    PlotColor::rgb(0.42, 0.67, 0.84),
    PlotColor::rgb(0.90, 0.76, 0.00),
    PlotColor::rgb(0.42, 0.83, 0.59),
    PlotColor::rgb(0.90, 0.32, 0.00),
    PlotColor::rgb(0.34, 0.67, 0.67),
    PlotColor::rgb(0.90, 0.59, 0.00),
    PlotColor::rgb(0.42, 0.82, 0.83),
    PlotColor::rgb(1.00, 0.85, 0.00),
    PlotColor::rgb(0.33, 0.67, 0.47),
    PlotColor::rgb(1.00, 0.38, 0.60),
    PlotColor::rgb(0.57, 0.67, 0.33),
    PlotColor::rgb(0.50, 0.20, 0.00),
    PlotColor::rgb(0.71, 0.82, 0.41),
    PlotColor::rgb(0.00, 0.20, 0.50),
    PlotColor::rgb(0.70, 0.32, 0.10),
];

const NAMED: [(&str, PlotColor); 24] = [
    ("black", BLACK),
    ("k", BLACK),
    ("white", WHITE),
    ("w", WHITE),
    ("red", PlotColor::rgb(1.0, 0.0, 0.0)),
    ("r", PlotColor::rgb(1.0, 0.0, 0.0)),
    ("green", PlotColor::rgb(0.0, 0.5, 0.0)),
    ("g", PlotColor::rgb(0.0, 0.5, 0.0)),
    ("blue", PlotColor::rgb(0.0, 0.0, 1.0)),
    ("b", PlotColor::rgb(0.0, 0.0, 1.0)),
    ("cyan", PlotColor::rgb(0.0, 1.0, 1.0)),
    ("c", PlotColor::rgb(0.0, 0.75, 0.75)),
    ("magenta", PlotColor::rgb(1.0, 0.0, 1.0)),
    ("m", PlotColor::rgb(0.75, 0.0, 0.75)),
    ("yellow", PlotColor::rgb(1.0, 1.0, 0.0)),
    ("y", PlotColor::rgb(0.75, 0.75, 0.0)),
    ("gray", PlotColor::rgb(0.5, 0.5, 0.5)),
    ("grey", PlotColor::rgb(0.5, 0.5, 0.5)),
    ("lightgray", PlotColor::rgb(0.83, 0.83, 0.83)),
    ("darkgray", PlotColor::rgb(0.66, 0.66, 0.66)),
    ("orange", PlotColor::rgb(1.0, 0.65, 0.0)),
    ("purple", PlotColor::rgb(0.5, 0.0, 0.5)),
    ("brown", PlotColor::rgb(0.65, 0.16, 0.16)),
    ("navy", PlotColor::rgb(0.0, 0.0, 0.5)),
];

impl PlotColor {
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn transparent() -> Self {
        Self {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 0.0,
        }
    }

    /// Parse a textual color: names, single letters, `#rrggbb[aa]`, or a
    /// `C0`..`C9` reference into `cycle`.
    pub fn parse(spec: &str, cycle: &[PlotColor]) -> Option<Self> {
        let spec = spec.trim();
        let lower = spec.to_ascii_lowercase();

        if lower == "none" {
            return Some(Self::transparent());
        }

        if let Some(hex) = spec.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        // Cycle references: "C0", "C1", ...
        if let Some(idx) = spec.strip_prefix('C').and_then(|n| n.parse::<usize>().ok()) {
            if cycle.is_empty() {
                return None;
            }
            return Some(cycle[idx % cycle.len()]);
        }

        let name = lower.strip_prefix("tab:").unwrap_or(&lower);
        NAMED
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, color)| *color)
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| -> Option<f64> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .ok()
                .map(|v| v as f64 / 255.0)
        };
        let alpha = if hex.len() == 8 { channel(6)? } else { 1.0 };
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: alpha,
        })
    }

    /// Parse a color from a JSON value: a string spec or a `[r, g, b(, a)]` array.
    pub fn from_value(value: &Value, key: &str, cycle: &[PlotColor]) -> Result<Self> {
        const EXPECTED: &str = "a color name, hex string or [r, g, b(, a)] array";

        match value {
            Value::String(s) => Self::parse(s, cycle).ok_or_else(|| PlotError::invalid(key, EXPECTED)),
            Value::Array(items) if items.len() == 3 || items.len() == 4 => {
                let channels: Option<Vec<f64>> = items.iter().map(Value::as_f64).collect();
                let channels = channels.ok_or_else(|| PlotError::invalid(key, EXPECTED))?;
                if channels.iter().any(|c| !(0.0..=1.0).contains(c)) {
                    return Err(PlotError::invalid(key, "color channels within 0..1"));
                }
                Ok(Self {
                    r: channels[0],
                    g: channels[1],
                    b: channels[2],
                    a: channels.get(3).copied().unwrap_or(1.0),
                })
            }
            _ => Err(PlotError::invalid(key, EXPECTED)),
        }
    }

    /// True when the value looks like a single color rather than a list of colors.
    pub fn is_single(value: &Value) -> bool {
        match value {
            Value::String(_) => true,
            Value::Array(items) => {
                (items.len() == 3 || items.len() == 4) && items.iter().all(Value::is_number)
            }
            _ => false,
        }
    }

    /// Convert to a plotters color, combining our alpha with an artist alpha.
    pub fn to_rgba(self, alpha: Option<f64>) -> RGBAColor {
        let a = self.a * alpha.unwrap_or(1.0).clamp(0.0, 1.0);
        RGBAColor(channel(self.r), channel(self.g), channel(self.b), a)
    }

    pub fn to_rgb(self) -> RGBColor {
        RGBColor(channel(self.r), channel(self.g), channel(self.b))
    }
}

fn channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Get the color for the `index`-th artist of an axis.
pub fn cycle_color(cycle: &[PlotColor], index: usize) -> PlotColor {
    if cycle.is_empty() {
        SIM_PALETTE[index % SIM_PALETTE.len()]
    } else {
        cycle[index % cycle.len()]
    }
}

/// Piecewise-linear colormap over `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colormap {
    pub name: &'static str,
    stops: &'static [(f64, [f64; 3])],
}

const VIRIDIS: &[(f64, [f64; 3])] = &[
    (0.00, [0.267, 0.005, 0.329]),
    (0.25, [0.231, 0.322, 0.545]),
    (0.50, [0.129, 0.569, 0.549]),
    (0.75, [0.369, 0.788, 0.384]),
    (1.00, [0.993, 0.906, 0.144]),
];

const JET: &[(f64, [f64; 3])] = &[
    (0.000, [0.0, 0.0, 0.5]),
    (0.125, [0.0, 0.0, 1.0]),
    (0.375, [0.0, 1.0, 1.0]),
    (0.625, [1.0, 1.0, 0.0]),
    (0.875, [1.0, 0.0, 0.0]),
    (1.000, [0.5, 0.0, 0.0]),
];

const GRAY: &[(f64, [f64; 3])] = &[(0.0, [0.0, 0.0, 0.0]), (1.0, [1.0, 1.0, 1.0])];

const HOT: &[(f64, [f64; 3])] = &[
    (0.000, [0.04, 0.0, 0.0]),
    (0.375, [1.0, 0.0, 0.0]),
    (0.750, [1.0, 1.0, 0.0]),
    (1.000, [1.0, 1.0, 1.0]),
];

const COOL: &[(f64, [f64; 3])] = &[(0.0, [0.0, 1.0, 1.0]), (1.0, [1.0, 0.0, 1.0])];

impl Colormap {
    pub fn from_name(name: &str) -> Option<Self> {
        let (name, stops) = match name.to_ascii_lowercase().as_str() {
            "viridis" => ("viridis", VIRIDIS),
            "jet" => ("jet", JET),
            "gray" | "grey" | "greys_r" => ("gray", GRAY),
            "hot" => ("hot", HOT),
            "cool" => ("cool", COOL),
            _ => return None,
        };
        Some(Self { name, stops })
    }

    /// Color at `t`, clamped into `0.0..=1.0`. NaN maps to transparent.
    pub fn eval(&self, t: f64) -> PlotColor {
        if t.is_nan() {
            return PlotColor::transparent();
        }
        let t = t.clamp(0.0, 1.0);
        let upper = self
            .stops
            .iter()
            .position(|(pos, _)| *pos >= t)
            .unwrap_or(self.stops.len() - 1);
        if upper == 0 {
            let [r, g, b] = self.stops[0].1;
            return PlotColor::rgb(r, g, b);
        }
        let (p0, c0) = self.stops[upper - 1];
        let (p1, c1) = self.stops[upper];
        let f = if p1 > p0 { (t - p0) / (p1 - p0) } else { 0.0 };
        let lerp = |i: usize| c0[i] + (c1[i] - c0[i]) * f;
        PlotColor::rgb(lerp(0), lerp(1), lerp(2))
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Self {
            name: "viridis",
            stops: VIRIDIS,
        }
    }
}

/// Linear normalization of values into `0.0..=1.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Normalize {
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
}

impl Normalize {
    /// Parse `{"vmin": .., "vmax": ..}` or `[vmin, vmax]`.
    pub fn from_value(value: &Value, key: &str) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Ok(Self {
                vmin: map.get("vmin").and_then(Value::as_f64),
                vmax: map.get("vmax").and_then(Value::as_f64),
            }),
            Value::Array(items) if items.len() == 2 => Ok(Self {
                vmin: items[0].as_f64(),
                vmax: items[1].as_f64(),
            }),
            _ => Err(PlotError::invalid(key, "{vmin, vmax} or [vmin, vmax]")),
        }
    }

    /// Normalize every value, autoscaling missing limits from the finite data.
    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        let finite = values.iter().copied().filter(|v| v.is_finite());
        let vmin = self
            .vmin
            .unwrap_or_else(|| finite.clone().fold(f64::INFINITY, f64::min));
        let vmax = self
            .vmax
            .unwrap_or_else(|| finite.fold(f64::NEG_INFINITY, f64::max));

        values
            .iter()
            .map(|&v| {
                if !v.is_finite() {
                    f64::NAN
                } else if vmax > vmin {
                    (v - vmin) / (vmax - vmin)
                } else {
                    0.0
                }
            })
            .collect()
    }
}
