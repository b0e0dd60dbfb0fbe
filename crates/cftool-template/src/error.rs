//! Error types for template and specification loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cftool-template operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading or decoding templates and specifications
#[derive(Debug, Error)]
pub enum Error {
    /// File could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension maps to no known template format
    #[error("Invalid template file format: '{0}' (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),

    /// JSON decoding failed
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML decoding failed
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
