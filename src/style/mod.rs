//! Style module - Colors, markers and the global style state

mod color;
mod marker;
mod params;

pub use color::{cycle_color, Colormap, Normalize, PlotColor, BLACK, SIM_PALETTE, WHITE};
pub use marker::Marker;
pub use params::{current, replace, reset, StyleGuard, StyleOverrides, StyleParams, STYLE_KEYS};
