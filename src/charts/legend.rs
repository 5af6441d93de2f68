//! Legend Module
//! Legend entries, placement and the options accepted when finishing a figure.

use crate::charts::figure::{Artist, Axes};
use crate::error::{PlotError, Result};
use crate::style::{PlotColor, StyleParams, BLACK, WHITE};
use plotters::chart::SeriesLabelPosition;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Anchor position inside the axes, named and numbered the usual way
/// (`0` = best, `1` = upper right, ... `10` = center).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Location {
    #[default]
    Best,
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
    Right,
    CenterLeft,
    CenterRight,
    LowerCenter,
    UpperCenter,
    Center,
}

const LOCATIONS: [(&str, Location); 11] = [
    ("best", Location::Best),
    ("upper right", Location::UpperRight),
    ("upper left", Location::UpperLeft),
    ("lower left", Location::LowerLeft),
    ("lower right", Location::LowerRight),
    ("right", Location::Right),
    ("center left", Location::CenterLeft),
    ("center right", Location::CenterRight),
    ("lower center", Location::LowerCenter),
    ("upper center", Location::UpperCenter),
    ("center", Location::Center),
];

impl Location {
    pub fn name(self) -> &'static str {
        LOCATIONS
            .iter()
            .find(|(_, loc)| *loc == self)
            .map(|(name, _)| *name)
            .unwrap_or("best")
    }

    pub fn from_code(code: u64) -> Option<Self> {
        LOCATIONS.get(code as usize).map(|(_, loc)| *loc)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        LOCATIONS.iter().find(|(n, _)| *n == name).map(|(_, loc)| *loc)
    }

    pub fn from_value(value: &Value, key: &str) -> Result<Self> {
        let loc = match value {
            Value::String(s) => Self::from_name(s),
            Value::Number(n) => n.as_u64().and_then(Self::from_code),
            _ => None,
        };
        loc.ok_or_else(|| PlotError::invalid(key, "a location name or code 0-10"))
    }

    /// Horizontal and vertical alignment as fractions (0 = left/bottom).
    pub fn anchor(self) -> (f64, f64) {
        match self {
            Self::Best | Self::UpperRight => (1.0, 1.0),
            Self::UpperLeft => (0.0, 1.0),
            Self::LowerLeft => (0.0, 0.0),
            Self::LowerRight => (1.0, 0.0),
            Self::Right | Self::CenterRight => (1.0, 0.5),
            Self::CenterLeft => (0.0, 0.5),
            Self::LowerCenter => (0.5, 0.0),
            Self::UpperCenter => (0.5, 1.0),
            Self::Center => (0.5, 0.5),
        }
    }

    pub fn series_label_position(self) -> SeriesLabelPosition {
        match self {
            Self::Best | Self::UpperRight => SeriesLabelPosition::UpperRight,
            Self::UpperLeft => SeriesLabelPosition::UpperLeft,
            Self::LowerLeft => SeriesLabelPosition::LowerLeft,
            Self::LowerRight => SeriesLabelPosition::LowerRight,
            Self::Right | Self::CenterRight => SeriesLabelPosition::MiddleRight,
            Self::CenterLeft => SeriesLabelPosition::MiddleLeft,
            Self::LowerCenter => SeriesLabelPosition::LowerMiddle,
            Self::UpperCenter => SeriesLabelPosition::UpperMiddle,
            Self::Center => SeriesLabelPosition::MiddleMiddle,
        }
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value, "loc").map_err(serde::de::Error::custom)
    }
}

/// Options for [`Legend::from_axes`]. Everything else a caller passes is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegendOptions {
    pub loc: Option<Location>,
    pub fontsize: Option<f64>,
    pub frameon: Option<bool>,
    pub framealpha: Option<f64>,
    pub facecolor: Option<Value>,
    pub edgecolor: Option<Value>,
    /// Replacement texts for the labelled artists, in drawing order.
    pub labels: Option<Vec<String>>,
}

/// How the legend sample for an entry is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendGlyph {
    Line,
    Marker,
    Patch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: PlotColor,
    pub glyph: LegendGlyph,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
    pub loc: Location,
    /// Font size in points.
    pub font_size: f64,
    pub frame_on: bool,
    pub frame_alpha: f64,
    pub face_color: PlotColor,
    pub edge_color: PlotColor,
}

impl Legend {
    /// Collect entries from the labelled artists of `axes`.
    pub fn from_axes(axes: &Axes, options: &LegendOptions, style: &StyleParams) -> Result<Self> {
        let mut entries: Vec<LegendEntry> = axes
            .labelled_artists()
            .map(|artist| LegendEntry {
                label: artist.label().unwrap_or_default().to_string(),
                color: artist.color(),
                glyph: match artist {
                    Artist::Trace(_) => LegendGlyph::Line,
                    Artist::Points(_) => LegendGlyph::Marker,
                    Artist::Bars(_) | Artist::Step(_) => LegendGlyph::Patch,
                },
            })
            .collect();

        if let Some(labels) = &options.labels {
            for (entry, label) in entries.iter_mut().zip(labels) {
                entry.label = label.clone();
            }
        }

        if entries.is_empty() {
            tracing::warn!("no artists with labels found to put in legend");
        }

        let color = |value: &Option<Value>, key: &str, default: PlotColor| -> Result<PlotColor> {
            value
                .as_ref()
                .map(|v| PlotColor::from_value(v, key, &style.color_cycle))
                .transpose()
                .map(|c| c.unwrap_or(default))
        };

        Ok(Self {
            entries,
            loc: options.loc.unwrap_or(style.legend_loc),
            font_size: options.fontsize.unwrap_or(style.legend_font_size),
            frame_on: options.frameon.unwrap_or(style.legend_frame_on),
            frame_alpha: options
                .framealpha
                .unwrap_or(style.legend_frame_alpha)
                .clamp(0.0, 1.0),
            face_color: color(&options.facecolor, "facecolor", WHITE)?,
            edge_color: color(&options.edgecolor, "edgecolor", BLACK)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::figure::Trace;
    use crate::style::Marker;
    use serde_json::json;

    fn labelled(label: &str, color: PlotColor) -> Artist {
        Artist::Trace(Trace {
            x: vec![0.0, 1.0],
            y: vec![0.0, 1.0],
            color,
            line_width: 1.0,
            marker: Marker::None,
            marker_size: 6.0,
            alpha: None,
            label: Some(label.to_string()),
        })
    }

    #[test]
    fn locations_parse_from_names_and_codes() {
        assert_eq!(Location::from_value(&json!(3), "loc").unwrap(), Location::LowerLeft);
        assert_eq!(
            Location::from_value(&json!("Upper Left"), "loc").unwrap(),
            Location::UpperLeft
        );
        assert!(Location::from_value(&json!(11), "loc").is_err());
        assert_eq!(Location::CenterLeft.name(), "center left");
    }

    #[test]
    fn options_deserialize_and_ignore_unknown_keys() {
        let options: LegendOptions = serde_json::from_value(json!({
            "loc": "lower right",
            "fontsize": 8,
            "handlelength": 2,
            "labels": ["E", "I"]
        }))
        .unwrap();
        assert_eq!(options.loc, Some(Location::LowerRight));
        assert_eq!(options.fontsize, Some(8.0));
        assert_eq!(options.labels.as_deref().map(<[String]>::len), Some(2));
    }

    #[test]
    fn entries_follow_labelled_artists_with_overrides() {
        let style = StyleParams::default();
        let mut axes = Axes::new();
        axes.add(labelled("exc", BLACK));
        axes.add(labelled("inh", WHITE));

        let options = LegendOptions {
            labels: Some(vec!["E".into()]),
            framealpha: Some(2.0),
            ..LegendOptions::default()
        };
        let legend = Legend::from_axes(&axes, &options, &style).unwrap();

        assert_eq!(legend.entries.len(), 2);
        assert_eq!(legend.entries[0].label, "E");
        assert_eq!(legend.entries[1].label, "inh");
        assert_eq!(legend.entries[0].glyph, LegendGlyph::Line);
        assert_eq!(legend.loc, Location::Best);
        assert_eq!(legend.frame_alpha, 1.0);
    }
}
