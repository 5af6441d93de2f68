//! Histogram Plotter

use crate::charts::{
    Align, Artist, Axes, BarSet, BinSpec, Bins, Cumulative, HistLayout, HistShape, HistType, Histogram,
    Orientation, StepOutline,
};
use crate::data::{DataProcessor, DataSource, PlotData};
use crate::error::{PlotError, Result};
use crate::plotter::{GeneralPlotter, PlotKind, Plotter, PlotterOptions};
use crate::style::{PlotColor, StyleParams};
use serde_json::Value;

/// Reads `x bins range density weights cumulative bottom histtype align
/// orientation rwidth log color alpha label stacked data`. When `x` or
/// `weights` is a string it names an entry of the `data` mapping.
pub struct HistPlotter {
    general: GeneralPlotter,
    histogram: Option<Histogram>,
}

impl HistPlotter {
    pub fn new(source: impl Into<DataSource>, options: PlotterOptions) -> Result<Self> {
        Ok(Self {
            general: GeneralPlotter::new(PlotKind::Histogram, source, options)?,
            histogram: None,
        })
    }

    /// Bin edges and tops computed by the last draw.
    pub fn histogram(&self) -> Option<&Histogram> {
        self.histogram.as_ref()
    }
}

impl Plotter for HistPlotter {
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
        let histogram = draw_histogram(data, style, axes)?;
        tracing::debug!(
            datasets = histogram.tops.len(),
            bins = histogram.edges.len().saturating_sub(1),
            "histogram drawn"
        );
        self.histogram = Some(histogram);
        Ok(())
    }
}

/// Value for `key`, following a string through the `data` mapping.
fn lookup<'a>(data: &'a PlotData, key: &str) -> Result<Option<&'a Value>> {
    match data.get(key) {
        Some(Value::String(name)) => data
            .get("data")
            .and_then(|d| d.get(name.as_str()))
            .filter(|v| !v.is_null())
            .map(Some)
            .ok_or_else(|| PlotError::missing(format!("data.{name}"))),
        other => Ok(other),
    }
}

fn parse_enum<T>(data: &PlotData, key: &str, expected: &str, parse: fn(&str) -> Option<T>) -> Result<Option<T>> {
    data.string(key)?
        .map(|s| parse(&s).ok_or_else(|| PlotError::invalid(key, expected)))
        .transpose()
}

fn draw_histogram(data: &PlotData, style: &StyleParams, axes: &mut Axes) -> Result<Histogram> {
    let x = lookup(data, "x")?.ok_or_else(|| PlotError::missing("x"))?;
    let datasets = DataProcessor::series(x, "x")?;
    let n = datasets.len();

    let bins = match data.get("bins") {
        None => Bins::Count(style.hist_bins),
        Some(Value::Number(count)) => Bins::Count(
            count
                .as_u64()
                .ok_or_else(|| PlotError::invalid("bins", "a bin count or a list of edges"))? as usize,
        ),
        Some(edges) => Bins::Edges(DataProcessor::floats(edges, "bins")?),
    };

    let range = match data.floats("range")? {
        None => None,
        Some(r) if r.len() == 2 => Some((r[0], r[1])),
        Some(_) => return Err(PlotError::invalid("range", "[min, max]")),
    };

    let weights = lookup(data, "weights")?
        .map(|w| DataProcessor::series(w, "weights"))
        .transpose()?;

    // `true` or a positive number accumulates forward, a negative number in reverse.
    let cumulative = match data.get("cumulative") {
        None | Some(Value::Bool(false)) => Cumulative::None,
        Some(Value::Bool(true)) => Cumulative::Forward,
        Some(value) => match DataProcessor::f64(value, "cumulative")? {
            v if v < 0.0 => Cumulative::Reverse,
            v if v > 0.0 => Cumulative::Forward,
            _ => Cumulative::None,
        },
    };

    let histtype = parse_enum(data, "histtype", "bar, barstacked, step or stepfilled", HistType::parse)?
        .unwrap_or_default();
    let align = parse_enum(data, "align", "left, mid or right", Align::parse)?.unwrap_or_default();
    let orientation =
        parse_enum(data, "orientation", "vertical or horizontal", Orientation::parse)?.unwrap_or_default();
    let stacked = data.bool("stacked")?.unwrap_or(false);

    let spec = BinSpec {
        bins,
        range,
        weights,
        density: data.bool("density")?.unwrap_or(false),
        cumulative,
        stacked: stacked || histtype == HistType::BarStacked,
    };
    let histogram = Histogram::compute(&datasets, &spec)?;

    let layout = HistLayout {
        histtype,
        align,
        orientation,
        rwidth: data.f64("rwidth")?,
        bottom: data.f64("bottom")?.unwrap_or(0.0),
        stacked,
    };

    let horizontal = orientation == Orientation::Horizontal;
    if data.bool("log")?.unwrap_or(false) {
        if horizontal {
            axes.x_scale.log = true;
        } else {
            axes.y_scale.log = true;
        }
    }

    let cycle = &style.color_cycle;
    let colors = DataProcessor::per_line(data.get("color"), n, "color", PlotColor::is_single, |v| {
        PlotColor::from_value(v, "color", cycle)
    })?;
    let labels = DataProcessor::per_line(data.get("label"), n, "label", Value::is_string, |v| {
        DataProcessor::string(v, "label")
    })?;
    let alpha = data.f64("alpha")?;

    for (k, shape) in layout.shapes(&histogram).into_iter().enumerate() {
        let color = colors[k].unwrap_or_else(|| axes.next_color(style));
        let label = labels[k].clone();
        let artist = match shape {
            HistShape::Bars(bars) => Artist::Bars(BarSet {
                bars,
                color,
                alpha,
                label,
                horizontal,
            }),
            HistShape::Step {
                points,
                filled,
                baseline,
            } => Artist::Step(StepOutline {
                points,
                filled,
                color,
                line_width: style.line_width,
                alpha,
                label,
                baseline,
                horizontal,
            }),
        };
        axes.add(artist);
    }

    Ok(histogram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::SIM_PALETTE;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn draw(value: Value) -> (Result<Histogram>, Axes) {
        let mut axes = Axes::new();
        let data = PlotData::from_value(value).unwrap();
        let result = draw_histogram(&data, &StyleParams::default(), &mut axes);
        (result, axes)
    }

    #[test]
    fn string_x_is_looked_up_in_data() {
        let (hist, axes) = draw(json!({
            "x": "spkt",
            "data": {"spkt": [1.0, 2.0, 2.5, 4.0]},
            "bins": 3
        }));
        let hist = hist.unwrap();
        assert_eq!(hist.edges, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(hist.tops, vec![vec![1.0, 2.0, 1.0]]);
        assert_eq!(axes.artists.len(), 1);
        assert_eq!(axes.artists[0].color(), SIM_PALETTE[0]);
    }

    #[test]
    fn missing_data_entry_is_reported() {
        let (hist, _) = draw(json!({"x": "spkt", "data": {}}));
        assert!(matches!(hist, Err(PlotError::MissingKey(k)) if k == "data.spkt"));
    }

    #[test]
    fn density_step_histogram_with_colors_and_labels() {
        let (hist, axes) = draw(json!({
            "x": [[0.0, 0.5, 1.5], [1.0, 1.5, 1.9]],
            "bins": [0, 1, 2],
            "density": true,
            "histtype": "step",
            "color": ["k", "r"],
            "label": ["exc", "inh"]
        }));
        let hist = hist.unwrap();
        assert_relative_eq!(hist.tops[0][0], 2.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(hist.tops[1][1], 1.0, epsilon = 1e-12);
        assert!(matches!(&axes.artists[0], Artist::Step(s) if !s.filled));
        assert_eq!(axes.artists[1].label(), Some("inh"));
        assert_eq!(axes.artists[1].color(), PlotColor::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn log_and_orientation_set_the_value_axis() {
        let (_, axes) = draw(json!({"x": [1, 2, 3], "log": true, "orientation": "horizontal"}));
        assert!(axes.x_scale.log);
        assert!(!axes.y_scale.log);
        assert!(matches!(&axes.artists[0], Artist::Bars(b) if b.horizontal));
    }

    #[test]
    fn invalid_options_are_errors() {
        assert!(draw(json!({"x": [1], "histtype": "violin"})).0.is_err());
        assert!(draw(json!({"x": [1], "range": [0]})).0.is_err());
        assert!(draw(json!({})).0.is_err());
    }

    #[test]
    fn cumulative_reverse_from_negative_number() {
        let (hist, _) = draw(json!({"x": [0.0, 1.0, 2.0], "bins": 2, "cumulative": -1}));
        assert_eq!(hist.unwrap().tops, vec![vec![3.0, 2.0]]);
    }
}
