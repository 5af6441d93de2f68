//! Data Loader Module
//! Reads and writes plot data mappings as JSON files.

use crate::data::PlotData;
use crate::error::{PlotError, Result};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Where the drawing parameters of a plot come from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Parameters passed in directly.
    Inline(PlotData),
    /// Path to a JSON file holding the parameters.
    File(PathBuf),
}

impl From<PlotData> for DataSource {
    fn from(data: PlotData) -> Self {
        Self::Inline(data)
    }
}

impl From<PathBuf> for DataSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for DataSource {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

impl DataSource {
    /// Resolve into the data mapping, reading the file if needed.
    pub fn resolve(self) -> Result<PlotData> {
        match self {
            Self::Inline(data) => Ok(data),
            Self::File(path) => DataLoader::load(&path),
        }
    }
}

/// Handles plot data file IO.
pub struct DataLoader;

impl DataLoader {
    /// Load a JSON object from `path`.
    pub fn load(path: &Path) -> Result<PlotData> {
        if !path.is_file() {
            return Err(PlotError::DataFile {
                path: path.to_path_buf(),
            });
        }

        let reader = BufReader::new(File::open(path)?);
        match serde_json::from_reader(reader)? {
            Value::Object(map) => {
                tracing::debug!(path = %path.display(), keys = map.len(), "loaded plot data");
                Ok(PlotData::from(map))
            }
            _ => Err(PlotError::NotAMapping {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Write `data` to `path` as pretty-printed JSON, creating parent directories.
    pub fn save(data: &PlotData, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, data.as_map())?;
        writer.flush()?;

        tracing::info!(path = %path.display(), "saved plot data");
        Ok(())
    }
}
