use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILE};
use crate::error::{FixError, Result};

/// Environment variable naming an alternative config file
pub const CONFIG_ENV_VAR: &str = "CMOR_FIXES_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub pipeline: PipelineConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the rolling JSON log; console only when unset
    pub directory: Option<PathBuf>,
    pub file_name: String,
    /// Filter used when `RUST_LOG` is not set
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: DEFAULT_LOG_FILE.to_string(),
            filter: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Delete fixed files written by file stages that a run does not return:
    /// all of them when a later stage fails, intermediates when it succeeds
    pub remove_partial_files: bool,
    /// Check after every metadata/data stage that shape and var_name held
    pub verify_invariants: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            remove_partial_files: true,
            verify_invariants: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Config {
    /// Load from `$CMOR_FIXES_CONFIG` or `config.toml`. A missing default
    /// file yields the default configuration; a missing file named by the
    /// environment variable is an error.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::load_from(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            Self::load_from(default_path)
        } else {
            debug!("No {} found, using default configuration", DEFAULT_CONFIG_PATH);
            Ok(Self::default())
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            FixError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.logging.file_name.trim().is_empty() {
            return Err(FixError::Config("logging.file_name must not be empty".to_string()));
        }
        Ok(config)
    }
}
