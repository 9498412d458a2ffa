//! SchemaGen: per-table code generation from a declarative database schema
//!
//! A YAML schema describes tables, columns, primary keys and foreign-key
//! references. SchemaGen resolves every unset option to its default and hands
//! each table to a code backend, writing one file per table.

pub mod codegen;
pub mod config;
pub mod error;
pub mod files;
pub mod pipeline;
pub mod progress;
pub mod schema;
pub mod utils;

use std::path::Path;

// Re-export main types for easier access
pub use codegen::{Backend, CodeBackend};
pub use config::Config;
pub use error::{Error, Result};
pub use files::{FileWriter, FsReader, Reader, Writer};
pub use pipeline::{CancellationToken, Pipeline, RunState, RunSummary};
pub use progress::{BarProgress, Progress, SilentProgress};
pub use schema::{Schema, SchemaLoader, TableDetail, TableQuery, TableReference};

/// Build a filesystem pipeline for the given configuration
pub fn pipeline(config: &Config) -> Pipeline<FsReader, FileWriter, Backend> {
    let pipeline = Pipeline::new(
        FsReader::new(),
        FileWriter::new(&config.naming),
        Backend::from_kind(config.backend.kind),
    );

    match &config.output.extension {
        Some(extension) => pipeline.with_extension(extension.clone()),
        None => pipeline,
    }
}

/// Generate every table of `schema_path` into the configured output directory
pub async fn generate(
    config: &Config,
    schema_path: impl AsRef<Path>,
    progress: &dyn Progress,
    cancel: &CancellationToken,
) -> Result<RunSummary> {
    pipeline(config)
        .run(
            schema_path.as_ref(),
            Path::new(&config.output.directory),
            progress,
            cancel,
        )
        .await
}
