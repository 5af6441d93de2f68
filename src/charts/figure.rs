//! Figure Model
//! Retained figure/axis/artist model that plotters draw into before rendering.
//!
//! Plotters backends draw immediately, so everything a plot kind contributes
//! is collected here first. Legends, scalebars and axis formatting are added
//! afterwards during the finishing step, then the whole figure is rendered.

use crate::charts::legend::Legend;
use crate::charts::scalebar::Scalebar;
use crate::style::{cycle_color, Marker, PlotColor, StyleParams};

/// Scatter points, one marker per point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Marker area in points squared, per point.
    pub sizes: Vec<f64>,
    /// Face/edge color, per point.
    pub colors: Vec<PlotColor>,
    pub marker: Marker,
    /// Stroke width in points for unfilled markers, per point.
    pub line_widths: Vec<f64>,
    pub alpha: Option<f64>,
    pub label: Option<String>,
}

/// A polyline with optional vertex markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub color: PlotColor,
    pub line_width: f64,
    pub marker: Marker,
    pub marker_size: f64,
    pub alpha: Option<f64>,
    pub label: Option<String>,
}

/// Axis-aligned rectangle in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSet {
    pub bars: Vec<Bar>,
    pub color: PlotColor,
    pub alpha: Option<f64>,
    pub label: Option<String>,
    /// Baseline is on the y axis (vertical bars) or x axis (horizontal bars).
    pub horizontal: bool,
}

/// Step outline of a histogram, optionally filled.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutline {
    pub points: Vec<(f64, f64)>,
    pub filled: bool,
    pub color: PlotColor,
    pub line_width: f64,
    pub alpha: Option<f64>,
    pub label: Option<String>,
    pub baseline: f64,
    pub horizontal: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Artist {
    Points(PointSet),
    Trace(Trace),
    Bars(BarSet),
    Step(StepOutline),
}

impl Artist {
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Points(p) => p.label.as_deref(),
            Self::Trace(t) => t.label.as_deref(),
            Self::Bars(b) => b.label.as_deref(),
            Self::Step(s) => s.label.as_deref(),
        }
    }

    /// Representative color for legend glyphs.
    pub fn color(&self) -> PlotColor {
        match self {
            Self::Points(p) => p.colors.first().copied().unwrap_or(crate::style::BLACK),
            Self::Trace(t) => t.color,
            Self::Bars(b) => b.color,
            Self::Step(s) => s.color,
        }
    }

    fn x_values(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        match self {
            Self::Points(p) => Box::new(p.x.iter().copied()),
            Self::Trace(t) => Box::new(t.x.iter().copied()),
            Self::Bars(b) => Box::new(b.bars.iter().flat_map(|bar| [bar.x0, bar.x1])),
            Self::Step(s) => Box::new(s.points.iter().map(|p| p.0)),
        }
    }

    fn y_values(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        match self {
            Self::Points(p) => Box::new(p.y.iter().copied()),
            Self::Trace(t) => Box::new(t.y.iter().copied()),
            Self::Bars(b) => Box::new(b.bars.iter().flat_map(|bar| [bar.y0, bar.y1])),
            Self::Step(s) => Box::new(s.points.iter().map(|p| p.1)),
        }
    }

    /// Values the autoscaler must not pad past (bar and step baselines).
    fn sticky(&self, horizontal_axis: bool) -> Vec<f64> {
        match self {
            Self::Bars(b) if b.horizontal == horizontal_axis => b
                .bars
                .iter()
                .map(|bar| if horizontal_axis { bar.x0 } else { bar.y0 })
                .collect(),
            Self::Step(s) if s.horizontal == horizontal_axis => vec![s.baseline],
            _ => Vec::new(),
        }
    }
}

/// Per-axis coordinate transform (log scale, inversion).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisScale {
    pub log: bool,
    pub inverted: bool,
}

impl AxisScale {
    /// Data value to chart coordinate. Non-positive values on a log axis map
    /// to negative infinity before inversion.
    pub fn forward(&self, v: f64) -> f64 {
        let t = if self.log {
            if v > 0.0 {
                v.log10()
            } else {
                f64::NEG_INFINITY
            }
        } else {
            v
        };
        if self.inverted {
            -t
        } else {
            t
        }
    }

    /// Chart coordinate back to a data value, used for tick labels.
    pub fn inverse(&self, t: f64) -> f64 {
        let t = if self.inverted { -t } else { t };
        if self.log {
            10f64.powf(t)
        } else {
            t
        }
    }

    /// Chart-coordinate range for data limits, ordered low to high.
    pub fn chart_range(&self, limits: (f64, f64)) -> (f64, f64) {
        let a = self.forward(limits.0);
        let b = self.forward(limits.1);
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    fn accepts(&self, v: f64) -> bool {
        v.is_finite() && (!self.log || v > 0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Axes {
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
    pub artists: Vec<Artist>,
    pub legend: Option<Legend>,
    pub scalebar: Option<Scalebar>,
    pub hide_x_axis: bool,
    pub hide_y_axis: bool,
    cycle_index: usize,
}

impl Axes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next color of the style's color cycle.
    pub fn next_color(&mut self, style: &StyleParams) -> PlotColor {
        let color = cycle_color(&style.color_cycle, self.cycle_index);
        self.cycle_index += 1;
        color
    }

    pub fn add(&mut self, artist: Artist) {
        self.artists.push(artist);
    }

    /// Flip the y direction; calling twice restores it.
    pub fn invert_yaxis(&mut self) {
        self.y_scale.inverted = !self.y_scale.inverted;
    }

    /// Artists that appear in a legend: labelled, and not starting with `_`.
    pub fn labelled_artists(&self) -> impl Iterator<Item = &Artist> {
        self.artists
            .iter()
            .filter(|a| a.label().is_some_and(|l| !l.is_empty() && !l.starts_with('_')))
    }

    /// Data-space x limits: the explicit limits or autoscaled data bounds.
    pub fn x_limits(&self, style: &StyleParams) -> (f64, f64) {
        self.xlim.unwrap_or_else(|| {
            let values = self.artists.iter().flat_map(Artist::x_values);
            let sticky: Vec<f64> = self.artists.iter().flat_map(|a| a.sticky(true)).collect();
            autoscale(values, &sticky, style.x_margin, self.x_scale)
        })
    }

    /// Data-space y limits: the explicit limits or autoscaled data bounds.
    pub fn y_limits(&self, style: &StyleParams) -> (f64, f64) {
        self.ylim.unwrap_or_else(|| {
            let values = self.artists.iter().flat_map(Artist::y_values);
            let sticky: Vec<f64> = self.artists.iter().flat_map(|a| a.sticky(false)).collect();
            autoscale(values, &sticky, style.y_margin, self.y_scale)
        })
    }
}

/// Pad the data bounds by `margin` of their span, except at sticky edges.
fn autoscale(
    values: impl Iterator<Item = f64>,
    sticky: &[f64],
    margin: f64,
    scale: AxisScale,
) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| scale.accepts(*v))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if min > max {
        return if scale.log { (1.0, 10.0) } else { (0.0, 1.0) };
    }

    let linear = AxisScale {
        log: scale.log,
        inverted: false,
    };
    let (tmin, tmax) = (linear.forward(min), linear.forward(max));

    if tmax - tmin <= f64::EPSILON * tmax.abs().max(1.0) {
        let delta = if tmin == 0.0 { 0.5 } else { tmin.abs() * 0.05 };
        return (linear.inverse(tmin - delta), linear.inverse(tmax + delta));
    }

    let pad = (tmax - tmin) * margin;
    let lo = if sticky.contains(&min) {
        min
    } else {
        linear.inverse(tmin - pad)
    };
    let hi = if sticky.contains(&max) {
        max
    } else {
        linear.inverse(tmax + pad)
    };
    (lo, hi)
}

/// A single-axis figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Size in inches.
    pub size: (f64, f64),
    /// Style snapshot taken when the figure was created.
    pub style: StyleParams,
    pub axes: Axes,
}

impl Figure {
    pub fn new(size: (f64, f64), style: StyleParams) -> Self {
        Self {
            size,
            style,
            axes: Axes::new(),
        }
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        self.style.pixel_size(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::BLACK;

    fn trace(x: Vec<f64>, y: Vec<f64>) -> Artist {
        Artist::Trace(Trace {
            x,
            y,
            color: BLACK,
            line_width: 1.0,
            marker: Marker::None,
            marker_size: 6.0,
            alpha: None,
            label: None,
        })
    }

    #[test]
    fn empty_axes_default_to_unit_range() {
        let axes = Axes::new();
        let style = StyleParams::default();
        assert_eq!(axes.x_limits(&style), (0.0, 1.0));
        assert_eq!(axes.y_limits(&style), (0.0, 1.0));
    }

    #[test]
    fn autoscale_pads_by_margin() {
        let mut axes = Axes::new();
        axes.add(trace(vec![0.0, 10.0], vec![-1.0, 1.0]));
        let style = StyleParams::default();

        let (x0, x1) = axes.x_limits(&style);
        assert!((x0 + 0.5).abs() < 1e-9 && (x1 - 10.5).abs() < 1e-9);

        axes.xlim = Some((2.0, 3.0));
        assert_eq!(axes.x_limits(&style), (2.0, 3.0));
    }

    #[test]
    fn bar_baseline_is_sticky() {
        let mut axes = Axes::new();
        axes.add(Artist::Bars(BarSet {
            bars: vec![Bar {
                x0: 0.0,
                x1: 1.0,
                y0: 0.0,
                y1: 4.0,
            }],
            color: BLACK,
            alpha: None,
            label: None,
            horizontal: false,
        }));
        let (y0, y1) = axes.y_limits(&StyleParams::default());
        assert_eq!(y0, 0.0);
        assert!((y1 - 4.2).abs() < 1e-9);
    }

    #[test]
    fn inversion_flips_chart_coordinates() {
        let mut axes = Axes::new();
        axes.invert_yaxis();
        assert_eq!(axes.y_scale.chart_range((0.0, 5.0)), (-5.0, 0.0));
        assert_eq!(axes.y_scale.inverse(-2.0), 2.0);
        axes.invert_yaxis();
        assert!(!axes.y_scale.inverted);
    }

    #[test]
    fn log_scale_ignores_non_positive_data() {
        let mut axes = Axes::new();
        axes.y_scale.log = true;
        axes.add(trace(vec![0.0, 1.0, 2.0], vec![0.0, 10.0, 1000.0]));
        let (lo, hi) = axes.y_limits(&StyleParams::default());
        assert!(lo < 10.0 && lo > 1.0);
        assert!(hi > 1000.0);
        assert_eq!(axes.y_scale.forward(0.0), f64::NEG_INFINITY);
    }

    #[test]
    fn color_cycle_advances() {
        let mut axes = Axes::new();
        let style = StyleParams::default();
        let first = axes.next_color(&style);
        let second = axes.next_color(&style);
        assert_eq!(first, style.color_cycle[0]);
        assert_eq!(second, style.color_cycle[1]);
    }

    #[test]
    fn underscore_labels_are_hidden_from_legend() {
        let mut axes = Axes::new();
        let mut shown = trace(vec![0.0], vec![0.0]);
        if let Artist::Trace(t) = &mut shown {
            t.label = Some("soma".into());
        }
        let mut hidden = trace(vec![0.0], vec![0.0]);
        if let Artist::Trace(t) = &mut hidden {
            t.label = Some("_nolegend_".into());
        }
        axes.add(shown);
        axes.add(hidden);
        axes.add(trace(vec![0.0], vec![0.0]));
        assert_eq!(axes.labelled_artists().count(), 1);
    }
}
