//! Style Parameters Module
//! Global (per-thread) style state and the override-and-restore guard.
//!
//! Plotters apply overrides when they are constructed and restore the
//! snapshot when the figure is finished. The state lives in a thread-local,
//! so figures built on different threads never see each other's overrides.

use crate::charts::{FileType, Location};
use crate::error::{PlotError, Result};
use crate::style::color::{PlotColor, SIM_PALETTE, WHITE};
use crate::style::marker::Marker;
use serde_json::{json, Map, Value};
use std::cell::RefCell;

/// Style overrides as given by the caller, keyed like `"lines.linewidth"`.
pub type StyleOverrides = Map<String, Value>;

/// Every key understood by [`StyleParams::set`] and [`StyleParams::get`].
pub const STYLE_KEYS: [&str; 24] = [
    "figure.figsize",
    "figure.dpi",
    "figure.facecolor",
    "font.family",
    "font.size",
    "axes.titlesize",
    "axes.labelsize",
    "axes.grid",
    "axes.prop_cycle",
    "axes.xmargin",
    "axes.ymargin",
    "lines.linewidth",
    "lines.markersize",
    "scatter.marker",
    "hist.bins",
    "legend.loc",
    "legend.fontsize",
    "legend.frameon",
    "legend.framealpha",
    "xtick.labelbottom",
    "ytick.labelleft",
    "xtick.labelsize",
    "ytick.labelsize",
    "savefig.format",
];

/// Typed style parameters. Sizes are in points, figure size in inches.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleParams {
    pub fig_size: (f64, f64),
    pub dpi: f64,
    pub face_color: PlotColor,
    pub font_family: String,
    pub font_size: f64,
    pub title_size: f64,
    pub label_size: f64,
    pub grid: bool,
    pub color_cycle: Vec<PlotColor>,
    pub x_margin: f64,
    pub y_margin: f64,
    pub line_width: f64,
    pub marker_size: f64,
    pub scatter_marker: Marker,
    pub hist_bins: usize,
    pub legend_loc: Location,
    pub legend_font_size: f64,
    pub legend_frame_on: bool,
    pub legend_frame_alpha: f64,
    pub x_tick_labels: bool,
    pub y_tick_labels: bool,
    pub x_tick_label_size: f64,
    pub y_tick_label_size: f64,
    pub save_format: FileType,
}

impl Default for StyleParams {
    fn default() -> Self {
        Self {
            fig_size: (6.4, 4.8),
            dpi: 100.0,
            face_color: WHITE,
            font_family: "sans-serif".to_string(),
            font_size: 10.0,
            title_size: 12.0,
            label_size: 10.0,
            grid: false,
            color_cycle: SIM_PALETTE.to_vec(),
            x_margin: 0.05,
            y_margin: 0.05,
            line_width: 1.5,
            marker_size: 6.0,
            scatter_marker: Marker::Circle,
            hist_bins: 10,
            legend_loc: Location::Best,
            legend_font_size: 10.0,
            legend_frame_on: true,
            legend_frame_alpha: 0.8,
            x_tick_labels: true,
            y_tick_labels: true,
            x_tick_label_size: 10.0,
            y_tick_label_size: 10.0,
            save_format: FileType::Png,
        }
    }
}

impl StyleParams {
    /// Set one parameter. Returns `Ok(false)` for unknown keys.
    pub fn set(&mut self, key: &str, value: &Value) -> Result<bool> {
        match key {
            "figure.figsize" => self.fig_size = pair(key, value)?,
            "figure.dpi" => self.dpi = positive(key, value)?,
            "figure.facecolor" => self.face_color = PlotColor::from_value(value, key, &self.color_cycle)?,
            "font.family" => self.font_family = string(key, value)?,
            "font.size" => self.font_size = positive(key, value)?,
            "axes.titlesize" => self.title_size = positive(key, value)?,
            "axes.labelsize" => self.label_size = positive(key, value)?,
            "axes.grid" => self.grid = boolean(key, value)?,
            "axes.prop_cycle" => {
                let items = value
                    .as_array()
                    .filter(|items| !items.is_empty())
                    .ok_or_else(|| PlotError::invalid(key, "a non-empty list of colors"))?;
                // Cycle references are resolved against the palette being replaced.
                self.color_cycle = items
                    .iter()
                    .map(|item| PlotColor::from_value(item, key, &self.color_cycle))
                    .collect::<Result<_>>()?;
            }
            "axes.xmargin" => self.x_margin = non_negative(key, value)?,
            "axes.ymargin" => self.y_margin = non_negative(key, value)?,
            "lines.linewidth" => self.line_width = non_negative(key, value)?,
            "lines.markersize" => self.marker_size = non_negative(key, value)?,
            "scatter.marker" => self.scatter_marker = Marker::from_value(Some(value), key, Marker::Circle)?,
            "hist.bins" => {
                self.hist_bins = value
                    .as_u64()
                    .filter(|&n| n > 0)
                    .ok_or_else(|| PlotError::invalid(key, "a positive integer"))? as usize
            }
            "legend.loc" => self.legend_loc = Location::from_value(value, key)?,
            "legend.fontsize" => self.legend_font_size = positive(key, value)?,
            "legend.frameon" => self.legend_frame_on = boolean(key, value)?,
            "legend.framealpha" => self.legend_frame_alpha = non_negative(key, value)?.min(1.0),
            "xtick.labelbottom" => self.x_tick_labels = boolean(key, value)?,
            "ytick.labelleft" => self.y_tick_labels = boolean(key, value)?,
            "xtick.labelsize" => self.x_tick_label_size = positive(key, value)?,
            "ytick.labelsize" => self.y_tick_label_size = positive(key, value)?,
            "savefig.format" => self.save_format = string(key, value)?.parse()?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Read one parameter back as JSON.
    pub fn get(&self, key: &str) -> Option<Value> {
        let color = |c: &PlotColor| json!([c.r, c.g, c.b, c.a]);
        let value = match key {
            "figure.figsize" => json!([self.fig_size.0, self.fig_size.1]),
            "figure.dpi" => json!(self.dpi),
            "figure.facecolor" => color(&self.face_color),
            "font.family" => json!(self.font_family),
            "font.size" => json!(self.font_size),
            "axes.titlesize" => json!(self.title_size),
            "axes.labelsize" => json!(self.label_size),
            "axes.grid" => json!(self.grid),
            "axes.prop_cycle" => Value::Array(self.color_cycle.iter().map(color).collect()),
            "axes.xmargin" => json!(self.x_margin),
            "axes.ymargin" => json!(self.y_margin),
            "lines.linewidth" => json!(self.line_width),
            "lines.markersize" => json!(self.marker_size),
            "scatter.marker" => json!(format!("{:?}", self.scatter_marker)),
            "hist.bins" => json!(self.hist_bins),
            "legend.loc" => json!(self.legend_loc.name()),
            "legend.fontsize" => json!(self.legend_font_size),
            "legend.frameon" => json!(self.legend_frame_on),
            "legend.framealpha" => json!(self.legend_frame_alpha),
            "xtick.labelbottom" => json!(self.x_tick_labels),
            "ytick.labelleft" => json!(self.y_tick_labels),
            "xtick.labelsize" => json!(self.x_tick_label_size),
            "ytick.labelsize" => json!(self.y_tick_label_size),
            "savefig.format" => json!(self.save_format.extension()),
            _ => return None,
        };
        Some(value)
    }

    /// Convert a size in points to pixels at this figure's dpi.
    pub fn points_to_px(&self, points: f64) -> f64 {
        points * self.dpi / 72.0
    }

    /// Figure size in pixels.
    pub fn pixel_size(&self, fig_size: (f64, f64)) -> (u32, u32) {
        let px = |inches: f64| (inches * self.dpi).round().max(1.0) as u32;
        (px(fig_size.0), px(fig_size.1))
    }
}

fn number(key: &str, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| PlotError::invalid(key, "a number"))
}

fn positive(key: &str, value: &Value) -> Result<f64> {
    let v = number(key, value)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(PlotError::invalid(key, "a positive number"))
    }
}

fn non_negative(key: &str, value: &Value) -> Result<f64> {
    let v = number(key, value)?;
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(PlotError::invalid(key, "a non-negative number"))
    }
}

fn boolean(key: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| PlotError::invalid(key, "true or false"))
}

fn string(key: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| PlotError::invalid(key, "a string"))
}

fn pair(key: &str, value: &Value) -> Result<(f64, f64)> {
    match value.as_array().map(Vec::as_slice) {
        Some([w, h]) => match (w.as_f64(), h.as_f64()) {
            (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Ok((w, h)),
            _ => Err(PlotError::invalid(key, "two positive numbers")),
        },
        _ => Err(PlotError::invalid(key, "[width, height]")),
    }
}

thread_local! {
    static CURRENT: RefCell<StyleParams> = RefCell::new(StyleParams::default());
}

/// Snapshot of the current thread's style state.
pub fn current() -> StyleParams {
    CURRENT.with(|style| style.borrow().clone())
}

/// Replace the current style state, returning the previous one.
pub fn replace(params: StyleParams) -> StyleParams {
    CURRENT.with(|style| style.replace(params))
}

/// Reset the current thread's style state to the defaults.
pub fn reset() {
    replace(StyleParams::default());
}

/// Applies style overrides and restores the snapshot taken before them.
///
/// Restoration happens on [`StyleGuard::restore`] or, failing that, on drop,
/// so an error halfway through a figure still leaves the state untouched.
#[derive(Debug)]
pub struct StyleGuard {
    original: Option<StyleParams>,
}

impl StyleGuard {
    /// Snapshot the current state and apply `overrides` on top of it.
    ///
    /// Unknown keys are logged and skipped; invalid values are an error (and
    /// the partially applied state is rolled back).
    pub fn apply(overrides: &StyleOverrides) -> Result<Self> {
        let guard = Self {
            original: Some(current()),
        };

        for (key, value) in overrides {
            let known = CURRENT.with(|style| style.borrow_mut().set(key, value))?;
            if known {
                tracing::debug!(key = %key, value = %value, "style override applied");
            } else {
                tracing::warn!("{} not found in style parameters", key);
            }
        }

        Ok(guard)
    }

    /// The state that will be restored.
    pub fn original(&self) -> Option<&StyleParams> {
        self.original.as_ref()
    }

    /// Restore the snapshot now.
    pub fn restore(mut self) {
        self.restore_inner();
    }

    fn restore_inner(&mut self) {
        if let Some(original) = self.original.take() {
            replace(original);
            tracing::trace!("style state restored");
        }
    }
}

impl Drop for StyleGuard {
    fn drop(&mut self) {
        self.restore_inner();
    }
}
