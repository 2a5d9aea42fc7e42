//! # Configuration
//!
//! Optional `cassette.toml`:
//!
//! ```toml
//! [solver]
//! command = "eugene-json"
//! args = []
//! collection = "allResults"
//!
//! [output]
//! directory = "."
//! ```
//!
//! Every key has a default, so an empty or missing file is valid.
//! Command-line flags override file values.

use cassette_core::CassetteError;
use cassette_core::assembly::RESULT_COLLECTION;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "cassette.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CassetteConfig {
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

/// External solver invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Program run by the command-line solver backend.
    pub command: String,
    pub args: Vec<String>,
    /// Result collection filled by the script.
    pub collection: String,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            command: "eugene-json".to_string(),
            args: Vec::new(),
            collection: RESULT_COLLECTION.to_string(),
        }
    }
}

/// Where generated files go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

impl CassetteConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, CassetteError> {
        toml::from_str(text).map_err(|e| CassetteError::InvalidDocument(format!("config: {}", e)))
    }

    /// Load `path`, or `cassette.toml` if present, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, CassetteError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let text = std::fs::read_to_string(&path).map_err(|e| {
            CassetteError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Self::from_toml_str(&text)
    }
}
