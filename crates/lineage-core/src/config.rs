//! Configuration schema (lineage.toml)
//!
//! The manifest location is not configurable; config only shapes output
//! and diagnostics.

use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up in the working directory when `--config` is not given
pub const CONFIG_FILE_NAME: &str = "lineage.toml";

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Rendering of a successful result
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

/// Diagnostic logging for manifest irregularities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Log parents that resolve to nothing (or to an unsupported resource type)
    /// at warn level instead of debug
    #[serde(default)]
    pub warn_unresolved: bool,

    /// Log a warning when several models share the queried name
    #[serde(default = "default_true")]
    pub warn_duplicates: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            warn_unresolved: false,
            warn_duplicates: true,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Resolve the effective config: an explicit path wins, then
    /// `lineage.toml` in `project_root`, then defaults.
    pub fn discover(project_root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let candidate = project_root.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            Self::from_file(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}
