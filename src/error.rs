//! Error type shared across the reconstruction pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by configuration loading and pipeline validation.
#[derive(Debug, Error)]
pub enum ReconError {
    /// Invalid parameter or input combination detected before the pipeline
    /// starts.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// File could not be read.
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content could not be parsed.
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}
