//! Plotter Options
//! Construction options and the keyword options accepted when finishing a figure.

use crate::charts::{Figure, LegendOptions, ScalebarOptions};
use crate::error::PlotError;
use crate::plotter::PlotterConfig;
use crate::style::StyleOverrides;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// The plot kinds; the name doubles as the default file description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    Scatter,
    Line,
    Lines,
    Histogram,
}

impl PlotKind {
    pub const ALL: [PlotKind; 4] = [Self::Scatter, Self::Line, Self::Lines, Self::Histogram];

    pub fn name(self) -> &'static str {
        match self {
            Self::Scatter => "scatter",
            Self::Line => "line",
            Self::Lines => "lines",
            Self::Histogram => "histogram",
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlotKind {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_ascii_lowercase();
        match s.as_str() {
            "hist" => Ok(Self::Histogram),
            _ => Self::ALL
                .into_iter()
                .find(|k| k.name() == s)
                .ok_or_else(|| PlotError::invalid("kind", "scatter, line, lines or histogram")),
        }
    }
}

/// Options used when a plotter is constructed.
#[derive(Debug, Clone, Default)]
pub struct PlotterOptions {
    /// Draw into this figure instead of creating a new one.
    pub figure: Option<Figure>,
    /// Style overrides for the lifetime of the plotter.
    pub style: StyleOverrides,
    /// Size in inches of a newly created figure.
    pub fig_size: Option<(f64, f64)>,
    pub config: PlotterConfig,
}

/// `true`/`false` or a set of options.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Toggle<T> {
    Enabled(bool),
    Options(T),
}

impl<T: Clone + Default> Toggle<T> {
    /// The options to use, or `None` when switched off.
    pub fn options(&self) -> Option<T> {
        match self {
            Self::Enabled(true) => Some(T::default()),
            Self::Enabled(false) => None,
            Self::Options(options) => Some(options.clone()),
        }
    }
}

/// `saveFig` accepts a flag or the file name to save under.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SaveFig {
    Enabled(bool),
    FileName(String),
}

/// Options for finishing a figure, keyed the same way as the plot functions
/// of simulation tools (`saveFig`, `fileDesc`, ...). Unknown keys are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FigureOptions {
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    #[serde(rename = "invert_yaxis")]
    pub invert_yaxis: bool,
    pub save_data: bool,
    pub legend: Option<Toggle<LegendOptions>>,
    pub scalebar: Option<Toggle<ScalebarOptions>>,
    pub save_fig: Option<SaveFig>,
    pub show_fig: bool,
    pub file_name: Option<String>,
    pub file_desc: Option<String>,
    pub file_type: Option<String>,
    pub file_dir: Option<PathBuf>,
    /// When false, a numeric `_NN` suffix keeps existing files intact.
    pub overwrite: bool,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            title: None,
            xlabel: None,
            ylabel: None,
            xlim: None,
            ylim: None,
            invert_yaxis: false,
            save_data: false,
            legend: None,
            scalebar: None,
            save_fig: None,
            show_fig: false,
            file_name: None,
            file_desc: None,
            file_type: None,
            file_dir: None,
            overwrite: true,
        }
    }
}

impl FigureOptions {
    pub fn wants_save(&self) -> bool {
        matches!(&self.save_fig, Some(SaveFig::Enabled(true)) | Some(SaveFig::FileName(_)))
    }

    /// Explicit file name, from `fileName` or a string `saveFig`.
    pub fn target_name(&self) -> Option<&str> {
        match (&self.file_name, &self.save_fig) {
            (Some(name), _) => Some(name.as_str()),
            (None, Some(SaveFig::FileName(name))) => Some(name.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::Location;
    use serde_json::json;

    #[test]
    fn kinds_parse_by_name() {
        assert_eq!("scatter".parse::<PlotKind>().unwrap(), PlotKind::Scatter);
        assert_eq!("Hist".parse::<PlotKind>().unwrap(), PlotKind::Histogram);
        assert!("matrix".parse::<PlotKind>().is_err());
        assert_eq!(PlotKind::Lines.to_string(), "lines");
    }

    #[test]
    fn figure_options_from_keyword_mapping() {
        let opts: FigureOptions = serde_json::from_value(json!({
            "title": "Raster",
            "xlim": [0, 1000],
            "ylim": null,
            "invert_yaxis": true,
            "legend": {"loc": 2},
            "scalebar": true,
            "saveFig": "raster.png",
            "fileDesc": "exc",
            "overwrite": false,
            "dpi": 300
        }))
        .unwrap();

        assert_eq!(opts.title.as_deref(), Some("Raster"));
        assert_eq!(opts.xlim, Some((0.0, 1000.0)));
        assert_eq!(opts.ylim, None);
        assert!(opts.invert_yaxis);
        assert!(!opts.overwrite);
        assert!(opts.wants_save());
        assert_eq!(opts.target_name(), Some("raster.png"));
        assert_eq!(
            opts.legend.and_then(|l| l.options()).and_then(|o| o.loc),
            Some(Location::UpperLeft)
        );
        assert!(opts.scalebar.and_then(|s| s.options()).is_some());
    }

    #[test]
    fn defaults_overwrite_and_skip_saving() {
        let opts = FigureOptions::default();
        assert!(opts.overwrite);
        assert!(!opts.wants_save());
        let off: FigureOptions = serde_json::from_value(json!({"saveFig": false, "legend": false})).unwrap();
        assert!(!off.wants_save());
        assert!(off.legend.and_then(|l| l.options()).is_none());
    }
}
