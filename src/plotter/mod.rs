//! Plotter module - Figure lifecycle and the plot kinds

mod config;
mod general;
mod hist;
mod line;
mod options;
mod plot;
mod scatter;

pub use config::{PlotterConfig, DEFAULT_FILE_NAME};
pub use general::{figure_file_name, next_free_path, GeneralPlotter};
pub use hist::HistPlotter;
pub use line::{LinePlotter, LinesPlotter};
pub use options::{FigureOptions, PlotKind, PlotterOptions, SaveFig, Toggle};
pub use plot::{plot, PlotOutput, Plotter};
pub use scatter::ScatterPlotter;
