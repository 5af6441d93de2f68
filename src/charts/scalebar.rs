//! Scalebar Module
//! Size bars anchored in a corner of the axes, used in place of tick labels
//! on voltage traces.

use crate::charts::figure::Axes;
use crate::charts::legend::Location;
use crate::error::Result;
use crate::style::{PlotColor, StyleParams, BLACK};
use serde::Deserialize;
use serde_json::Value;

/// Options for [`Scalebar::build`]. The defaults produce a 100 µV vertical
/// bar in the lower left corner, with the y axis hidden.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScalebarOptions {
    /// Horizontal bar length in data units; 0 draws no horizontal bar.
    pub sizex: f64,
    /// Vertical bar length in data units; defaults to `100 / scaley`.
    pub sizey: Option<f64>,
    /// Size the horizontal bar from the x tick spacing.
    pub matchx: bool,
    /// Size the vertical bar from the y tick spacing.
    pub matchy: bool,
    pub hidex: bool,
    pub hidey: bool,
    pub labelx: Option<String>,
    pub labely: Option<String>,
    /// Multiplier from data units to label units.
    pub scalex: f64,
    pub scaley: f64,
    pub unitsx: String,
    pub unitsy: String,
    pub loc: Location,
    /// Padding to the axes border, in fractions of the font size.
    pub pad: f64,
    /// Separation between bar and label, in points.
    pub sep: f64,
    pub barcolor: Option<Value>,
    /// Bar width in points.
    pub barwidth: f64,
}

impl Default for ScalebarOptions {
    fn default() -> Self {
        Self {
            sizex: 0.0,
            sizey: None,
            matchx: false,
            matchy: false,
            hidex: false,
            hidey: true,
            labelx: None,
            labely: None,
            scalex: 1.0,
            scaley: 1000.0,
            unitsx: "ms".to_string(),
            unitsy: "µV".to_string(),
            loc: Location::LowerLeft,
            pad: 0.5,
            sep: 3.0,
            barcolor: None,
            barwidth: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scalebar {
    /// Horizontal bar length in data units (0 = none).
    pub size_x: f64,
    /// Vertical bar length in data units (0 = none).
    pub size_y: f64,
    pub label_x: Option<String>,
    pub label_y: Option<String>,
    pub loc: Location,
    pub pad: f64,
    pub sep: f64,
    pub color: PlotColor,
    pub width: f64,
}

impl Scalebar {
    /// Resolve bar sizes and labels for `axes`, hiding axes as requested.
    pub fn build(axes: &mut Axes, options: &ScalebarOptions, style: &StyleParams) -> Result<Self> {
        let size_x = if options.matchx {
            let (lo, hi) = axes.x_limits(style);
            nice_step(hi - lo, 5)
        } else {
            options.sizex.abs()
        };

        let size_y = if options.matchy {
            let (lo, hi) = axes.y_limits(style);
            nice_step(hi - lo, 5)
        } else {
            options
                .sizey
                .map(f64::abs)
                .unwrap_or(100.0 / options.scaley)
        };

        let label = |explicit: &Option<String>, size: f64, scale: f64, units: &str| {
            if size <= 0.0 {
                return None;
            }
            // An empty label draws the bar alone.
            match explicit {
                Some(text) if text.is_empty() => None,
                Some(text) => Some(text.clone()),
                None => Some(format!("{} {}", format_sig(size * scale, 3), units)),
            }
        };

        if options.hidex {
            axes.hide_x_axis = true;
        }
        if options.hidey {
            axes.hide_y_axis = true;
        }

        let color = options
            .barcolor
            .as_ref()
            .map(|v| PlotColor::from_value(v, "barcolor", &style.color_cycle))
            .transpose()?
            .unwrap_or(BLACK);

        let scalebar = Self {
            size_x,
            size_y,
            label_x: label(&options.labelx, size_x, options.scalex, &options.unitsx),
            label_y: label(&options.labely, size_y, options.scaley, &options.unitsy),
            loc: options.loc,
            pad: options.pad,
            sep: options.sep,
            color,
            width: options.barwidth,
        };
        tracing::debug!(size_x, size_y, "scalebar added");
        Ok(scalebar)
    }
}

/// Round a span to a 1/2/5 x 10^k step giving roughly `target` intervals.
pub fn nice_step(span: f64, target: usize) -> f64 {
    if !(span.is_finite() && span > 0.0) {
        return 0.0;
    }
    let raw = span / target.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction < 1.5 {
        1.0
    } else if fraction < 3.5 {
        2.0
    } else if fraction < 7.5 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Format with `digits` significant digits, dropping trailing zeros.
pub fn format_sig(value: f64, digits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{}", value);
    }
    let exponent = value.abs().log10().floor() as i32;
    if exponent < -4 || exponent >= digits as i32 {
        let formatted = format!("{:.*e}", digits.saturating_sub(1), value);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{}", trim_zeros(mantissa), exp),
            None => formatted,
        };
    }
    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    trim_zeros(&format!("{:.*}", decimals, value)).to_string()
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_bar_is_100_microvolts() {
        let mut axes = Axes::new();
        let scalebar =
            Scalebar::build(&mut axes, &ScalebarOptions::default(), &StyleParams::default()).unwrap();

        assert!((scalebar.size_y - 0.1).abs() < 1e-12);
        assert_eq!(scalebar.size_x, 0.0);
        assert_eq!(scalebar.label_y.as_deref(), Some("100 µV"));
        assert_eq!(scalebar.label_x, None);
        assert_eq!(scalebar.loc, Location::LowerLeft);
        assert!(axes.hide_y_axis);
        assert!(!axes.hide_x_axis);
    }

    #[test]
    fn matchx_uses_tick_spacing() {
        let mut axes = Axes::new();
        axes.xlim = Some((0.0, 1000.0));
        let options: ScalebarOptions = serde_json::from_value(json!({
            "matchx": true,
            "hidex": true,
            "sizey": -0.5,
            "barcolor": "r"
        }))
        .unwrap();
        let scalebar = Scalebar::build(&mut axes, &options, &StyleParams::default()).unwrap();

        assert_eq!(scalebar.size_x, 200.0);
        assert_eq!(scalebar.label_x.as_deref(), Some("200 ms"));
        assert_eq!(scalebar.size_y, 0.5);
        assert_eq!(scalebar.label_y.as_deref(), Some("500 µV"));
        assert!(axes.hide_x_axis);
    }

    #[test]
    fn nice_steps() {
        assert_eq!(nice_step(10.0, 5), 2.0);
        assert_eq!(nice_step(1.0, 5), 0.2);
        assert_eq!(nice_step(37.0, 5), 5.0);
        assert_eq!(nice_step(0.0, 5), 0.0);
    }

    #[test]
    fn significant_digit_formatting() {
        assert_eq!(format_sig(100.0, 3), "100");
        assert_eq!(format_sig(0.125, 3), "0.125");
        assert_eq!(format_sig(2.5, 3), "2.5");
        assert_eq!(format_sig(12345.0, 3), "1.23e4");
    }
}
