//! Error types for SchemaGen

use std::path::PathBuf;

use thiserror::Error;

/// Result type for SchemaGen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for SchemaGen
#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema file not found: {}", .0.display())]
    SchemaNotFound(PathBuf),

    #[error("Schema decode error: {0}")]
    SchemaDecode(String),

    #[error("Failed to open output for table `{table}`: {source}")]
    StreamAcquisition {
        table: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Failed to generate table `{table}`: {source}")]
    Generation {
        table: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Output `{location}` is already used by table `{table}`")]
    OutputCollision { location: String, table: String },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Progress error: {0}")]
    Progress(String),

    #[error("Generation cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Identifier of the table a per-table failure belongs to
    pub fn table(&self) -> Option<&str> {
        match self {
            Error::StreamAcquisition { table, .. } | Error::Generation { table, .. } => Some(table),
            _ => None,
        }
    }
}

/// Convert YAML decode errors to SchemaGen errors
impl From<serde_yaml::Error> for Error {
    fn from(error: serde_yaml::Error) -> Self {
        Error::SchemaDecode(error.to_string())
    }
}

/// Convert Serde JSON errors to SchemaGen errors
impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::SerializationError(error.to_string())
    }
}

/// Convert TOML deserialization errors to SchemaGen errors
impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::ConfigError(error.to_string())
    }
}
