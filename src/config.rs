//! Configuration loading and management for clinicalthread.
//!
//! Loads settings from `clinicalthread.toml` with environment variable overrides for
//! sensitive data. Every field has a default, so running without a config file works.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the working directory and under `~/.config`.
pub const CONFIG_FILE: &str = "clinicalthread.toml";

/// Environment variable that overrides `api.anthropic_key`.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("missing API key: set ANTHROPIC_API_KEY or api.anthropic_key")]
    MissingApiKey,
}

/// Text-generation endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Messages endpoint. Point this at a proxy to keep the credential server-side.
    pub endpoint: String,
    /// Model identifier
    pub model: String,
    /// Upper bound on reply size, in tokens
    pub max_tokens: u32,
    /// Value of the `anthropic-version` header
    pub api_version: String,
    /// Request timeout; requests run to completion when unset
    pub timeout_secs: Option<u64>,
}

/// API keys configuration (loaded from environment)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub anthropic_key: Option<String>,
}

/// Log file location used while the TUI owns the terminal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location, falling back to defaults
    /// when no config file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::read_file(&path)?,
            None => Config::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::read_file(path)?;
        config.apply_env();
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Override API keys from environment variables
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api.anthropic_key = Some(key);
            }
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        dirs::home_dir()
            .map(|home| home.join(".config").join("clinicalthread").join(CONFIG_FILE))
            .filter(|path| path.exists())
    }

    /// Get the API key used to authenticate against the endpoint
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api
            .anthropic_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 1000,
            api_version: "2023-06-01".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./data"),
        }
    }
}
