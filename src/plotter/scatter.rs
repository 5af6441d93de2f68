//! Scatter Plotter
//! Points with per-point sizes and colors, e.g. spike rasters.

use crate::charts::{Artist, Axes, PointSet};
use crate::data::{DataProcessor, DataSource, PlotData};
use crate::error::{PlotError, Result};
use crate::plotter::{GeneralPlotter, PlotKind, Plotter, PlotterOptions};
use crate::style::{Colormap, Marker, Normalize, PlotColor, StyleParams};
use serde_json::Value;

/// Reads `x y s c marker linewidth linewidths cmap norm alpha label`.
pub struct ScatterPlotter {
    general: GeneralPlotter,
}

impl ScatterPlotter {
    pub fn new(source: impl Into<DataSource>, options: PlotterOptions) -> Result<Self> {
        Ok(Self {
            general: GeneralPlotter::new(PlotKind::Scatter, source, options)?,
        })
    }
}

impl Plotter for ScatterPlotter {
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
        let points = scatter_points(data, style, axes)?;
        tracing::debug!(points = points.x.len(), "scatter drawn");
        axes.add(Artist::Points(points));
        Ok(())
    }
}

fn scatter_points(data: &PlotData, style: &StyleParams, axes: &mut Axes) -> Result<PointSet> {
    let x = data.require_floats("x")?;
    let y = data.require_floats("y")?;
    if x.len() != y.len() {
        return Err(PlotError::length_mismatch("y", x.len(), y.len()));
    }
    let n = x.len();

    let sizes = DataProcessor::per_point(data.get("s"), n, "s")?
        .unwrap_or_else(|| vec![style.marker_size.powi(2); n]);

    // A numeric list with one value per point is colormapped, even when it
    // could also read as a single RGB(A) color.
    let colors = match data.get("c") {
        None => vec![axes.next_color(style); n],
        Some(c @ Value::Array(items))
            if items.len() == n && items.iter().all(|v| v.is_number() || v.is_null()) =>
        {
            let values = DataProcessor::floats(c, "c")?;
            let cmap = match data.string("cmap")? {
                Some(name) => Colormap::from_name(&name)
                    .ok_or_else(|| PlotError::invalid("cmap", "viridis, jet, gray, hot or cool"))?,
                None => Colormap::default(),
            };
            let norm = data
                .get("norm")
                .map(|v| Normalize::from_value(v, "norm"))
                .transpose()?
                .unwrap_or_default();
            norm.apply(&values).into_iter().map(|t| cmap.eval(t)).collect()
        }
        Some(c) if PlotColor::is_single(c) => vec![PlotColor::from_value(c, "c", &style.color_cycle)?; n],
        Some(Value::Array(items)) => {
            if items.len() != n {
                return Err(PlotError::length_mismatch("c", n, items.len()));
            }
            items
                .iter()
                .map(|item| PlotColor::from_value(item, "c", &style.color_cycle))
                .collect::<Result<_>>()?
        }
        Some(_) => return Err(PlotError::invalid("c", "a color, a list of colors or a list of numbers")),
    };

    // `linewidths` wins over `linewidth`; a one-entry list applies to every point.
    let widths = data
        .get("linewidths")
        .filter(|v| !v.is_null())
        .or_else(|| data.get("linewidth"));
    let line_widths = match widths {
        Some(Value::Array(items)) if items.len() == 1 => vec![DataProcessor::f64(&items[0], "linewidths")?; n],
        value => DataProcessor::per_point(value, n, "linewidths")?.unwrap_or_else(|| vec![style.line_width; n]),
    };

    Ok(PointSet {
        x,
        y,
        sizes,
        colors,
        marker: Marker::from_value(data.get("marker"), "marker", style.scatter_marker)?,
        line_widths,
        alpha: data.f64("alpha")?,
        label: data.string("label")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::SIM_PALETTE;
    use serde_json::json;

    fn draw(value: Value) -> Result<PointSet> {
        let data = PlotData::from_value(value).unwrap();
        scatter_points(&data, &StyleParams::default(), &mut Axes::new())
    }

    #[test]
    fn defaults_come_from_style() {
        let points = draw(json!({"x": [1, 2, 3], "y": [0, 1, 0]})).unwrap();
        assert_eq!(points.sizes, vec![36.0; 3]);
        assert_eq!(points.colors, vec![SIM_PALETTE[0]; 3]);
        assert_eq!(points.marker, Marker::Circle);
        assert_eq!(points.alpha, None);
    }

    #[test]
    fn numeric_colors_use_colormap() {
        let points = draw(json!({
            "x": [0, 1, 2, 3],
            "y": [0, 0, 0, 0],
            "c": [0.0, 1.0, 2.0, null],
            "cmap": "gray",
            "s": 4,
            "marker": "|"
        }))
        .unwrap();
        assert_eq!(points.colors[0], PlotColor::rgb(0.0, 0.0, 0.0));
        assert_eq!(points.colors[2], PlotColor::rgb(1.0, 1.0, 1.0));
        assert_eq!(points.colors[3].a, 0.0);
        assert_eq!(points.sizes, vec![4.0; 4]);
        assert_eq!(points.marker, Marker::VLine);
    }

    #[test]
    fn rgb_triplet_is_one_color_unless_one_value_per_point() {
        let points = draw(json!({"x": [0, 1], "y": [0, 1], "c": [1.0, 0.0, 0.0]})).unwrap();
        assert!(points.colors.iter().all(|c| *c == PlotColor::rgb(1.0, 0.0, 0.0)));

        // Three spikes colored by gid.
        let points = draw(json!({"x": [1, 2, 3], "y": [1, 2, 3], "c": [5, 10, 20], "cmap": "gray"})).unwrap();
        assert_eq!(points.colors[0], PlotColor::rgb(0.0, 0.0, 0.0));
        assert_eq!(points.colors[2], PlotColor::rgb(1.0, 1.0, 1.0));

        let points = draw(json!({"x": [1, 2, 3], "y": [1, 2, 3], "c": [0.1, 0.5, 0.9], "cmap": "jet"})).unwrap();
        assert_ne!(points.colors[0], points.colors[2]);
        assert_ne!(points.colors[0], PlotColor::rgb(0.1, 0.5, 0.9));
    }

    #[test]
    fn edge_widths_are_per_point() {
        let points = draw(json!({"x": [0, 1, 2], "y": [0, 1, 2], "linewidths": [0.5, 1.0, 2.0]})).unwrap();
        assert_eq!(points.line_widths, vec![0.5, 1.0, 2.0]);

        let points = draw(json!({"x": [0, 1], "y": [0, 1], "linewidths": [3.0]})).unwrap();
        assert_eq!(points.line_widths, vec![3.0, 3.0]);

        let points = draw(json!({"x": [0, 1], "y": [0, 1], "linewidth": 2})).unwrap();
        assert_eq!(points.line_widths, vec![2.0, 2.0]);

        let points = draw(json!({"x": [0, 1], "y": [0, 1]})).unwrap();
        assert_eq!(points.line_widths, vec![StyleParams::default().line_width; 2]);

        assert!(matches!(
            draw(json!({"x": [0, 1], "y": [0, 1], "linewidths": [1, 2, 3]})),
            Err(PlotError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn mismatched_lengths_are_errors() {
        assert!(matches!(
            draw(json!({"x": [0, 1], "y": [0]})),
            Err(PlotError::LengthMismatch { .. })
        ));
        assert!(matches!(
            draw(json!({"x": [0, 1], "y": [0, 1], "c": ["r", "g", "b"]})),
            Err(PlotError::LengthMismatch { .. })
        ));
        assert!(matches!(draw(json!({"y": [0]})), Err(PlotError::MissingKey(_))));
        assert!(draw(json!({"x": [0], "y": [0], "cmap": "nope", "c": [1, 2]})).is_err());
    }
}
