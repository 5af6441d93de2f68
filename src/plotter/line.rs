//! Line Plotters
//! A single trace (`line`) or several traces sharing one axis (`lines`).

use crate::charts::{Artist, Axes, Trace};
use crate::data::{DataProcessor, DataSource, PlotData};
use crate::error::{PlotError, Result};
use crate::plotter::{GeneralPlotter, PlotKind, Plotter, PlotterOptions};
use crate::style::{Marker, PlotColor, StyleParams};
use serde_json::Value;

/// One line: `x y color marker markersize linewidth alpha label`.
/// Without `x` the samples are plotted against their index.
pub struct LinePlotter {
    general: GeneralPlotter,
}

impl LinePlotter {
    pub fn new(source: impl Into<DataSource>, options: PlotterOptions) -> Result<Self> {
        Ok(Self {
            general: GeneralPlotter::new(PlotKind::Line, source, options)?,
        })
    }
}

impl Plotter for LinePlotter {
    fn general(&self) -> &GeneralPlotter {
        &self.general
    }

    fn general_mut(&mut self) -> &mut GeneralPlotter {
        &mut self.general
    }

    fn into_general(self) -> GeneralPlotter {
        self.general
    }

    fn draw(&mut self) -> Result<()> {
        let (data, style, axes) = self.general.parts_mut();
        let trace = line_trace(data, style, axes)?;
        axes.add(Artist::Trace(trace));
        Ok(())
    }
}

fn line_trace(data: &PlotData, style: &StyleParams, axes: &mut Axes) -> Result<Trace> {
    let y = data.require_floats("y")?;
    let x = match data.floats("x")? {
        Some(x) => x,
        None => sample_index(y.len()),
    };
    if x.len() != y.len() {
        return Err(PlotError::length_mismatch("y", x.len(), y.len()));
    }

    let color = match data.get("color") {
        Some(value) => PlotColor::from_value(value, "color", &style.color_cycle)?,
        None => axes.next_color(style),
    };

    Ok(Trace {
        x,
        y,
        color,
        line_width: data.f64("linewidth")?.unwrap_or(style.line_width),
        marker: Marker::from_value(data.get("marker"), "marker", Marker::None)?,
        marker_size: data.f64("markersize")?.unwrap_or(style.marker_size),
        alpha: data.f64("alpha")?,
        label: data.string("label")?,
    })
}

/// Several lines over a shared `x`: `y` is a list of lines, and the per-line
/// keys `colors markers markersizes linewidths alphas label` take either one
/// value for every line or a list with one value per line.
pub struct LinesPlotter {
    general: GeneralPlotter,
}

impl LinesPlotter {
    pub fn new(source: impl Into<DataSource>, options: PlotterOptions) -> Result<Self> {
        Ok(Self {
            general: GeneralPlotter::new(PlotKind::Lines, source, options)?,
        })
    }
}

impl Plotter for LinesPlotter {
    fn general(&self) -> &GeneralPlotter {
        &self.general
    }

    fn general_mut(&mut self) -> &mut GeneralPlotter {
        &mut self.general
    }

    fn into_general(self) -> GeneralPlotter {
        self.general
    }

    fn draw(&mut self) -> Result<()> {
        let (data, style, axes) = self.general.parts_mut();
        let traces = lines_traces(data, style, axes)?;
        tracing::debug!(lines = traces.len(), "lines drawn");
        for trace in traces {
            axes.add(Artist::Trace(trace));
        }
        Ok(())
    }
}

fn lines_traces(data: &PlotData, style: &StyleParams, axes: &mut Axes) -> Result<Vec<Trace>> {
    let ys = data.series("y")?.ok_or_else(|| PlotError::missing("y"))?;
    let n = ys.len();

    // A single x series is shared; otherwise one per line.
    let xs = match data.series("x")? {
        None => ys.iter().map(|y| sample_index(y.len())).collect(),
        Some(mut xs) if xs.len() == 1 => vec![xs.remove(0); n],
        Some(xs) if xs.len() == n => xs,
        Some(xs) => return Err(PlotError::length_mismatch("x", n, xs.len())),
    };

    let cycle = &style.color_cycle;
    let colors = DataProcessor::per_line(data.get("colors"), n, "colors", PlotColor::is_single, |v| {
        PlotColor::from_value(v, "colors", cycle)
    })?;
    let markers = DataProcessor::per_line(data.get("markers"), n, "markers", Value::is_string, |v| {
        Marker::from_value(Some(v), "markers", Marker::None)
    })?;
    let number = |key: &'static str| {
        DataProcessor::per_line(data.get(key), n, key, Value::is_number, |v| {
            DataProcessor::f64(v, key)
        })
    };
    let marker_sizes = number("markersizes")?;
    let line_widths = number("linewidths")?;
    let alphas = number("alphas")?;
    let labels = DataProcessor::per_line(data.get("label"), n, "label", Value::is_string, |v| {
        DataProcessor::string(v, "label")
    })?;

    ys.into_iter()
        .zip(xs)
        .enumerate()
        .map(|(i, (y, x))| {
            if x.len() != y.len() {
                return Err(PlotError::length_mismatch(format!("y[{i}]"), x.len(), y.len()));
            }
            Ok(Trace {
                x,
                y,
                color: colors[i].unwrap_or_else(|| axes.next_color(style)),
                line_width: line_widths[i].unwrap_or(style.line_width),
                marker: markers[i].unwrap_or(Marker::None),
                marker_size: marker_sizes[i].unwrap_or(style.marker_size),
                alpha: alphas[i],
                label: labels[i].clone(),
            })
        })
        .collect()
}

fn sample_index(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}
