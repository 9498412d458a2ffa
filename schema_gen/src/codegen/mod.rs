//! Code generation backends
//!
//! A backend turns one table's resolved definition into one output artifact.

pub mod json;
pub mod mysql;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::config::BackendKind;
use crate::error::Result;
use crate::files::OutputTarget;
use crate::schema::{Column, DbConfig, TableDetail, TableReference};

pub use json::JsonBackend;
pub use mysql::MySqlBackend;

/// Renders tables into output streams
#[async_trait]
pub trait CodeBackend: Send + Sync {
    /// Default file extension of generated artifacts
    fn extension(&self) -> &str;

    /// Receive the schema-wide settings before any table is generated
    fn set_config(&self, config: &DbConfig);

    /// Generate the artifact for one table into `output`
    async fn generate_table(
        &self,
        table: &TableDetail,
        columns: &[Column],
        references: &[TableReference],
        output: &dyn OutputTarget,
    ) -> Result<()>;
}

/// Enumeration of built-in backends
#[derive(Debug)]
pub enum Backend {
    MySql(MySqlBackend),
    Json(JsonBackend),
}

impl Backend {
    /// Create the backend selected in configuration
    pub fn from_kind(kind: BackendKind) -> Self {
        match kind {
            BackendKind::Mysql => Backend::MySql(MySqlBackend::new()),
            BackendKind::Json => Backend::Json(JsonBackend::new()),
        }
    }
}

#[async_trait]
impl CodeBackend for Backend {
    fn extension(&self) -> &str {
        match self {
            Backend::MySql(backend) => backend.extension(),
            Backend::Json(backend) => backend.extension(),
        }
    }

    fn set_config(&self, config: &DbConfig) {
        match self {
            Backend::MySql(backend) => backend.set_config(config),
            Backend::Json(backend) => backend.set_config(config),
        }
    }

    async fn generate_table(
        &self,
        table: &TableDetail,
        columns: &[Column],
        references: &[TableReference],
        output: &dyn OutputTarget,
    ) -> Result<()> {
        match self {
            Backend::MySql(backend) => {
                backend.generate_table(table, columns, references, output).await
            }
            Backend::Json(backend) => {
                backend.generate_table(table, columns, references, output).await
            }
        }
    }
}

/// Write a rendered artifact to a freshly opened stream
pub(crate) async fn write_output(output: &dyn OutputTarget, contents: &[u8]) -> Result<()> {
    let mut stream = output.open().await?;
    stream.write_all(contents).await?;
    stream.shutdown().await?;

    tracing::debug!(location = %output.location(), bytes = contents.len(), "Output written");
    Ok(())
}
