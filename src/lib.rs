//! simplot - Figure lifecycle layer for simulation results
//!
//! Plot kinds (scatter, line, lines, histogram) read their drawing parameters
//! from a loosely-typed mapping, draw into a retained figure, and share one
//! finishing step: axis formatting, data saving, legend, scalebar, saving and
//! showing, then restoring the global style state.

pub mod charts;
pub mod data;
pub mod error;
pub mod plotter;
pub mod style;

pub use charts::{Figure, FileType};
pub use data::{DataSource, PlotData};
pub use error::{PlotError, Result};
pub use plotter::{
    plot, FigureOptions, GeneralPlotter, HistPlotter, LinePlotter, LinesPlotter, PlotKind, PlotOutput, Plotter,
    PlotterConfig, PlotterOptions, ScatterPlotter,
};
