//! Configuration management utilities

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the deployment environment
pub const ENVIRONMENT_ENV: &str = "YIELDWATCH_ENV";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (dev, prod, etc.)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "yieldwatch".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Build the configuration, taking the environment name from `YIELDWATCH_ENV`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(env) = std::env::var(ENVIRONMENT_ENV) {
            if !env.trim().is_empty() {
                config.environment = env.trim().to_string();
            }
        }
        config
    }
}

/// Errors raised while reading a JSON configuration file
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for the requested type
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load any deserializable configuration type from a JSON file
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigFileError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
