//! Charts module - Figure model, decorations and rendering

mod figure;
mod histogram;
mod legend;
mod renderer;
mod scalebar;

pub use figure::{Artist, AxisScale, Axes, Bar, BarSet, Figure, PointSet, StepOutline, Trace};
pub use histogram::{Align, BinSpec, Bins, Cumulative, HistLayout, HistShape, HistType, Histogram, Orientation};
pub use legend::{Legend, LegendEntry, LegendGlyph, LegendOptions, Location};
pub use renderer::{FigureRenderer, FileType};
pub use scalebar::{format_sig, nice_step, Scalebar, ScalebarOptions};
