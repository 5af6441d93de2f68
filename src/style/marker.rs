//! Marker shapes for points and line vertices.

use crate::error::{PlotError, Result};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Marker {
    #[default]
    None,
    Circle,
    Point,
    Square,
    TriangleUp,
    TriangleDown,
    TriangleLeft,
    TriangleRight,
    Diamond,
    Star,
    Cross,
    Plus,
    /// Vertical tick, the usual raster marker.
    VLine,
    HLine,
    /// Single pixel.
    Pixel,
}

impl Marker {
    pub fn parse(spec: &str) -> Option<Self> {
        let marker = match spec {
            "" | "none" | "None" | " " => Self::None,
            "o" => Self::Circle,
            "." => Self::Point,
            "," => Self::Pixel,
            "s" => Self::Square,
            "^" => Self::TriangleUp,
            "v" => Self::TriangleDown,
            "<" => Self::TriangleLeft,
            ">" => Self::TriangleRight,
            "*" => Self::Star,
            "D" | "d" => Self::Diamond,
            "x" => Self::Cross,
            "+" => Self::Plus,
            "|" => Self::VLine,
            "_" => Self::HLine,
            _ => return None,
        };
        Some(marker)
    }

    /// Parse from a JSON value; `null` yields `default`.
    pub fn from_value(value: Option<&Value>, key: &str, default: Marker) -> Result<Self> {
        match value {
            None | Some(Value::Null) => Ok(default),
            Some(Value::String(s)) => Self::parse(s)
                .ok_or_else(|| PlotError::invalid(key, "one of o . , s ^ v < > d D * x + | _")),
            Some(_) => Err(PlotError::invalid(key, "a marker string")),
        }
    }

    /// Markers drawn as filled areas; the rest are stroked.
    pub fn is_filled(self) -> bool {
        matches!(
            self,
            Self::Circle
                | Self::Point
                | Self::Square
                | Self::TriangleUp
                | Self::TriangleDown
                | Self::TriangleLeft
                | Self::TriangleRight
                | Self::Diamond
                | Self::Star
        )
    }

    pub fn is_visible(self) -> bool {
        self != Self::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_raster_and_filled_markers() {
        assert_eq!(Marker::parse("|"), Some(Marker::VLine));
        assert!(!Marker::VLine.is_filled());
        assert!(Marker::parse("o").unwrap().is_filled());
        assert_eq!(Marker::parse("?"), None);
    }

    #[test]
    fn parses_pointing_triangles_star_and_pixel() {
        assert_eq!(Marker::parse("<"), Some(Marker::TriangleLeft));
        assert_eq!(Marker::parse(">"), Some(Marker::TriangleRight));
        assert_eq!(Marker::parse("*"), Some(Marker::Star));
        assert_eq!(Marker::parse(","), Some(Marker::Pixel));
        assert!(Marker::Star.is_filled());
        assert!(!Marker::Pixel.is_filled());
    }

    #[test]
    fn null_falls_back_to_default() {
        let m = Marker::from_value(Some(&json!(null)), "marker", Marker::Circle).unwrap();
        assert_eq!(m, Marker::Circle);
        assert!(Marker::from_value(Some(&json!(3)), "marker", Marker::None).is_err());
    }
}
