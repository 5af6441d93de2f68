//! Plot Trait
//! The draw-then-finish contract every plot kind implements.

use crate::charts::Figure;
use crate::data::DataSource;
use crate::error::Result;
use crate::plotter::{
    FigureOptions, GeneralPlotter, HistPlotter, LinePlotter, LinesPlotter, PlotKind, PlotterOptions,
    ScatterPlotter,
};
use std::path::PathBuf;

/// What a finished plot hands back.
#[derive(Debug, Clone)]
pub struct PlotOutput {
    pub figure: Figure,
    /// Where the figure was saved, if it was.
    pub file_name: Option<PathBuf>,
}

pub trait Plotter {
    fn general(&self) -> &GeneralPlotter;

    fn general_mut(&mut self) -> &mut GeneralPlotter;

    fn into_general(self) -> GeneralPlotter
    where
        Self: Sized;

    /// Add this plot kind's artists to the axes.
    fn draw(&mut self) -> Result<()>;

    /// Draw, then finish the figure with `opts`.
    fn plot(mut self, opts: &FigureOptions) -> Result<PlotOutput>
    where
        Self: Sized,
    {
        // A failed draw still restores the style when `self` is dropped.
        self.draw()?;

        let mut general = self.into_general();
        general.finish(opts)?;
        Ok(PlotOutput {
            file_name: general.file_name().map(PathBuf::from),
            figure: general.into_figure(),
        })
    }
}

/// Build the plotter for `kind` and run it.
pub fn plot(
    kind: PlotKind,
    source: impl Into<DataSource>,
    options: PlotterOptions,
    opts: &FigureOptions,
) -> Result<PlotOutput> {
    tracing::info!(kind = %kind, "plotting");
    match kind {
        PlotKind::Scatter => ScatterPlotter::new(source, options)?.plot(opts),
        PlotKind::Line => LinePlotter::new(source, options)?.plot(opts),
        PlotKind::Lines => LinesPlotter::new(source, options)?.plot(opts),
        PlotKind::Histogram => HistPlotter::new(source, options)?.plot(opts),
    }
}
