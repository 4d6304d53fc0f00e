#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for jobrun
//!
//! This crate handles loading and merging composite policy from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/jobrun/config.toml)
//! - Environment variables
//! - CLI flags (applied by the caller)

pub mod constants;
pub mod policy;

pub use policy::{FailureOrder, ParallelConfig, SerialConfig};

use jobrun_errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,

    #[serde(default)]
    pub parallel: ParallelConfig,
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir
            .join(constants::CONFIG_DIR_NAME)
            .join(constants::CONFIG_FILE_NAME))
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this structure.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        let config = Self::from_toml(&contents)?;
        tracing::debug!(path = %path.display(), "loaded jobrun config");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), ConfigError> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Merge overrides looked up by variable name
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds a value that cannot be parsed.
    pub fn merge_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // JOBRUN_CANCEL_CHECKPOINTS
        if let Some(value) = lookup(constants::ENV_CANCEL_CHECKPOINTS) {
            self.serial.cancel_checkpoints =
                parse_bool(constants::ENV_CANCEL_CHECKPOINTS, value)?;
        }

        // JOBRUN_SUPPRESS_CANCELLATION
        if let Some(value) = lookup(constants::ENV_SUPPRESS_CANCELLATION) {
            self.parallel.suppress_cancellation =
                parse_bool(constants::ENV_SUPPRESS_CANCELLATION, value)?;
        }

        // JOBRUN_FAILURE_ORDER
        if let Some(value) = lookup(constants::ENV_FAILURE_ORDER) {
            self.parallel.failure_order =
                value.parse().map_err(|_| ConfigError::InvalidValue {
                    field: constants::ENV_FAILURE_ORDER.to_string(),
                    value,
                })?;
        }

        Ok(())
    }
}

fn parse_bool(field: &str, value: String) -> Result<bool, ConfigError> {
    match value.as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value,
        }),
    }
}
