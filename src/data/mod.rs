//! Data module - Plot data loading and parameter extraction

mod loader;
mod processor;

pub use loader::{DataLoader, DataSource};
pub use processor::{DataProcessor, PlotData};
