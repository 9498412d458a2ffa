//! Configuration handling for SchemaGen

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "schema_gen.toml";

/// Load configuration from a TOML file
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let config_str = fs::read_to_string(path)
        .map_err(|e| Error::ConfigError(format!("Failed to read config file {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| Error::ConfigError(format!("Failed to parse config file: {}", e)))?;

    Ok(config)
}

/// Load `path` when given, else `schema_gen.toml` if present, else defaults
pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_from_file(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => load_from_file(DEFAULT_CONFIG_FILE),
        None => Ok(Config::default()),
    }
}

/// Represents the complete SchemaGen configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub backend: BackendConfig,
    pub naming: NamingConfig,
    pub logging: Option<LoggingConfig>,
}

/// Where generated files go
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
    /// File extension; the backend's own extension when unset
    pub extension: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "./generated".to_string(),
            extension: None,
        }
    }
}

/// Available code backends
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Mysql,
    Json,
}

/// Code backend selection
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
}

/// Naming conventions configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct NamingConfig {
    /// Convention applied to table identifiers to build file names
    pub file_style: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            file_style: "none".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub format: String,
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            format: "text".to_string(),
            stdout: true,
        }
    }
}
