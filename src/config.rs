//! Configuration for a cleanup run.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CleanupError, Result};

/// How the cleaned table is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-delimited `.las`-style table
    #[default]
    Tsv,
    /// Comma-separated table with the same header
    Csv,
    /// Array of JSON records
    Json,
    /// Columnar Parquet file (needs an output path)
    Parquet,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Tsv => "tsv",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Parquet => "parquet",
        };
        f.write_str(name)
    }
}

/// Depth window and output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanupConfig {
    /// Shallowest depth kept by the trim
    #[serde(default = "default_min_depth")]
    pub min_depth: i64,

    /// Deepest depth kept by the trim
    #[serde(default = "default_max_depth")]
    pub max_depth: i64,

    /// Sort ascending by depth before cleaning
    #[serde(default)]
    pub sort_first: bool,

    #[serde(default)]
    pub format: OutputFormat,
}

fn default_min_depth() -> i64 {
    4000
}

fn default_max_depth() -> i64 {
    7500
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            min_depth: default_min_depth(),
            max_depth: default_max_depth(),
            sort_first: false,
            format: OutputFormat::default(),
        }
    }
}

impl CleanupConfig {
    /// Load configuration from a JSON file. Missing keys take their defaults.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CleanupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| CleanupError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration as pretty JSON.
    pub fn to_json<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
