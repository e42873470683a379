use std::num::ParseFloatError;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while ingesting or cleaning a drilling log.
#[derive(Error, Debug)]
pub enum CleanupError {
    /// Failed to open or read an input or configuration file.
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row passed the shape and header checks but a channel is not a number.
    #[error("line {line}: field {field} ('{value}') is not a number")]
    MalformedRow {
        line: usize,
        field: usize,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    /// No measurement reaches the requested minimum depth.
    #[error("trim window {min_depth}..={max_depth} selects no rows: no depth reaches {min_depth}")]
    OutOfRangeTrim { min_depth: i64, max_depth: i64 },

    /// The configuration file is not valid JSON for [`crate::config::CleanupConfig`].
    #[error("invalid configuration in '{}': {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for ingestion and cleaning.
pub type Result<T> = std::result::Result<T, CleanupError>;
