//! Plotter Configuration
//! Output defaults shared by every plot: base file name, directory, format
//! and a base layer of style overrides.

use crate::error::Result;
use crate::style::StyleOverrides;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// File name used when a figure is saved without an explicit name.
pub const DEFAULT_FILE_NAME: &str = "model_output";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlotterConfig {
    /// Base name for saved figures and data.
    pub file_name: String,
    pub file_dir: Option<PathBuf>,
    /// Default output format (`png`, `svg`, ...); falls back to `savefig.format`.
    pub file_type: Option<String>,
    /// Overrides applied before the per-plot ones.
    pub style: StyleOverrides,
}

impl Default for PlotterConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            file_dir: None,
            file_type: None,
            style: StyleOverrides::new(),
        }
    }
}

impl PlotterConfig {
    /// Load a configuration from a JSON file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        tracing::debug!(path = %path.display(), "loaded plotter config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_to_model_output() {
        let config = PlotterConfig::default();
        assert_eq!(config.file_name, "model_output");
        assert!(config.file_dir.is_none());
        assert!(config.style.is_empty());
    }

    #[test]
    fn loads_partial_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"fileName": "run42", "style": {{"axes.grid": true}}}}"#
        )
        .unwrap();

        let config = PlotterConfig::load(file.path()).unwrap();
        assert_eq!(config.file_name, "run42");
        assert_eq!(config.file_type, None);
        assert_eq!(config.style.get("axes.grid"), Some(&serde_json::Value::Bool(true)));
    }
}
