//! Runtime configuration loading for the demo binaries.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ReconError;
use crate::reconstruct::ReconParams;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputConfig {
    /// Where to write the JSON run report; stdout when absent.
    pub json_out: Option<PathBuf>,
}

/// Top-level config file consumed by the demo binaries.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeConfig {
    pub recon_params: ReconParams,
    pub output: OutputConfig,
}

/// Loads a JSON runtime config. Missing fields fall back to defaults.
pub fn load_config(path: &Path) -> Result<RuntimeConfig, ReconError> {
    let contents = fs::read_to_string(path).map_err(|e| ReconError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&contents).map_err(|e| ReconError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
