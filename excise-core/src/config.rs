//! Configuration loading from excise.toml.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{ExciseError, ExciseResult, IoResultExt};
use crate::pattern::ConstructSpec;

/// Main configuration structure for excise.toml.
#[derive(Debug, Deserialize, Default)]
pub struct ExciseConfig {
    /// Filename suffix that selects rewrite targets.
    pub suffix: Option<String>,
    /// The construct to remove.
    pub construct: Option<ConstructSpec>,
    /// Pipeline tuning knobs.
    pub engine: Option<EngineConfig>,
}

/// Pipeline tuning configuration.
#[derive(Debug, Deserialize, Default)]
pub struct EngineConfig {
    /// How many preceding lines to scan for setup bindings.
    pub lookback_window: Option<usize>,
    /// Longest run of blank lines to keep.
    pub max_blank_run: Option<usize>,
}

/// Loads configuration from excise.toml if it exists.
pub fn load_config(root: &Path) -> ExciseResult<Option<ExciseConfig>> {
    let path = root.join("excise.toml");
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).with_path(&path)?;
    let cfg =
        toml::from_str(&content).map_err(|e| ExciseError::config(&path, e.to_string()))?;
    Ok(Some(cfg))
}
