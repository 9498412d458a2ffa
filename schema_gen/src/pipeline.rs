//! Generation pipeline
//!
//! Drives one run: load the schema, configure the backend, then generate
//! every table in schema order. The first failure stops the run.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

pub use tokio_util::sync::CancellationToken;

use crate::codegen::CodeBackend;
use crate::error::{Error, Result};
use crate::files::{Reader, Writer};
use crate::progress::Progress;
use crate::schema::{SchemaLoader, TableQuery};

/// Phase of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Loading,
    Configuring,
    Generating,
    Done,
    Failed,
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of tables generated
    pub tables: usize,
    /// Output locations in generation order
    pub outputs: Vec<String>,
}

/// Schema to per-table artifacts pipeline
pub struct Pipeline<R, W, B> {
    reader: R,
    writer: W,
    backend: B,
    extension: Option<String>,
    state: Mutex<RunState>,
}

impl<R: Reader, W: Writer, B: CodeBackend> Pipeline<R, W, B> {
    /// Create a new pipeline from its capabilities
    pub fn new(reader: R, writer: W, backend: B) -> Self {
        Self {
            reader,
            writer,
            backend,
            extension: None,
            state: Mutex::new(RunState::Idle),
        }
    }

    /// Override the backend's file extension
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn state(&self) -> RunState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn transition(&self, state: RunState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
        tracing::debug!(state = ?state, "Pipeline state changed");
    }

    /// Generate one artifact per table of the schema at `schema_path` below `root`
    pub async fn run(
        &self,
        schema_path: &Path,
        root: &Path,
        progress: &dyn Progress,
        cancel: &CancellationToken,
    ) -> Result<RunSummary> {
        let result = self.execute(schema_path, root, progress, cancel).await;

        match &result {
            Ok(summary) => {
                self.transition(RunState::Done);
                tracing::info!(tables = summary.tables, root = %root.display(), "Generation finished");
            }
            Err(e) => {
                self.transition(RunState::Failed);
                tracing::error!(error = %e, table = e.table(), "Generation failed");
            }
        }

        result
    }

    async fn execute(
        &self,
        schema_path: &Path,
        root: &Path,
        progress: &dyn Progress,
        cancel: &CancellationToken,
    ) -> Result<RunSummary> {
        self.transition(RunState::Loading);
        let schema = SchemaLoader::new(&self.reader).load(schema_path).await?;

        self.transition(RunState::Configuring);
        self.backend.set_config(&schema.config);
        let query = TableQuery::new(&schema);
        let tables = query.list_tables();

        self.transition(RunState::Generating);
        progress.set_total(tables.len() as u64);
        progress.start()?;

        let extension = self
            .extension
            .as_deref()
            .unwrap_or_else(|| self.backend.extension());
        let mut outputs = Vec::with_capacity(tables.len());
        let mut claimed: HashMap<String, String> = HashMap::new();

        for detail in &tables {
            let table_id = detail.table.id.as_str();

            if cancel.is_cancelled() {
                tracing::warn!(table = table_id, "Cancelled before generating table");
                return Err(Error::Cancelled);
            }

            let columns = query.get_columns(table_id);
            let references = query.get_references(table_id);

            let target = self
                .writer
                .open_for_table(table_id, root, extension)
                .await
                .map_err(|e| Error::StreamAcquisition {
                    table: table_id.to_string(),
                    source: Box::new(e),
                })?;

            let location = target.location();
            if let Some(previous) = claimed.get(&location) {
                return Err(Error::StreamAcquisition {
                    table: table_id.to_string(),
                    source: Box::new(Error::OutputCollision {
                        location,
                        table: previous.clone(),
                    }),
                });
            }
            claimed.insert(location.clone(), table_id.to_string());

            self.backend
                .generate_table(detail, &columns, &references, target.as_ref())
                .await
                .map_err(|e| Error::Generation {
                    table: table_id.to_string(),
                    source: Box::new(e),
                })?;

            progress.advance(1);
            tracing::info!(table = table_id, location = %location, "Table generated");
            outputs.push(location);
        }

        progress.finish()?;

        Ok(RunSummary {
            tables: tables.len(),
            outputs,
        })
    }
}
