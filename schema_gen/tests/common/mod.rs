//! Test doubles for the pipeline capabilities

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use schema_gen::files::{OutputStream, OutputTarget};
use schema_gen::schema::{Column, DbConfig};
use schema_gen::{
    CancellationToken, CodeBackend, Error, Progress, Reader, Result, TableDetail, TableReference,
    Writer,
};

pub const TWO_TABLES: &str = r#"
config:
  dbms: mysql
  version: "8.0"
  database: chat
tables:
  - id: user
    description: User accounts
    name: users
    engine: InnoDB
    char_set: utf8mb4
    primary_key:
      columns:
        - name: id
    columns:
      - id: id
        description: User ID
        name: id
        type:
          name: int
          length: 11
        extra:
          auto_increment: true
      - id: name
        description: Display name
        name: name
        type:
          name: varchar
          length: 64
  - id: message
    description: Chat messages
    name: messages
    primary_key:
      columns:
        - name: id
    columns:
      - id: id
        name: id
        type:
          name: int
          length: 11
        extra:
          auto_increment: true
      - id: user_id
        name: user_id
        type:
          name: int
          length: 11
        reference:
          - table: user
            columns:
              - name: id
      - id: body
        name: body
        type:
          name: text
"#;

pub const THREE_TABLES: &str = r#"
tables:
  - id: user
    columns:
      - id: id
        type:
          name: int
  - id: message
    columns:
      - id: id
        type:
          name: int
  - id: attachment
    columns:
      - id: id
        type:
          name: int
"#;

/// In-memory files
#[derive(Default)]
pub struct MemoryReader {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryReader {
    pub fn with_file(path: &str, contents: &str) -> Self {
        let mut files = HashMap::new();
        files.insert(PathBuf::from(path), contents.as_bytes().to_vec());
        Self { files }
    }
}

#[async_trait]
impl Reader for MemoryReader {
    async fn is_exist(&self, path: &Path) -> Result<bool> {
        Ok(self.files.contains_key(path))
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            Error::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                path.display().to_string(),
            ))
        })
    }
}

/// An output target that is never opened by the recording backend
pub struct NamedTarget(pub String);

#[async_trait]
impl OutputTarget for NamedTarget {
    fn location(&self) -> String {
        self.0.clone()
    }

    async fn open(&self) -> Result<OutputStream> {
        Ok(Box::new(tokio::io::sink()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenCall {
    pub table: String,
    pub root: PathBuf,
    pub extension: String,
}

/// Records every acquisition and optionally fails for one table
#[derive(Default)]
pub struct RecordingWriter {
    pub fail_on: Option<String>,
    /// Hand every table the same location
    pub fixed_location: Option<String>,
    pub calls: Mutex<Vec<OpenCall>>,
}

impl RecordingWriter {
    pub fn failing_on(table: &str) -> Self {
        Self {
            fail_on: Some(table.to_string()),
            ..Self::default()
        }
    }

    pub fn tables(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|c| c.table.clone()).collect()
    }
}

#[async_trait]
impl Writer for RecordingWriter {
    async fn open_for_table(
        &self,
        table_id: &str,
        root: &Path,
        extension: &str,
    ) -> Result<Box<dyn OutputTarget>> {
        self.calls.lock().unwrap().push(OpenCall {
            table: table_id.to_string(),
            root: root.to_path_buf(),
            extension: extension.to_string(),
        });

        if self.fail_on.as_deref() == Some(table_id) {
            return Err(Error::IoError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only output",
            )));
        }

        let location = self
            .fixed_location
            .clone()
            .unwrap_or_else(|| format!("{}/{}.{}", root.display(), table_id, extension));
        Ok(Box::new(NamedTarget(location)))
    }
}

#[derive(Debug, Clone)]
pub struct GenerateCall {
    pub table: TableDetail,
    pub columns: Vec<Column>,
    pub references: Vec<TableReference>,
    pub location: String,
}

/// Records every generation request
#[derive(Default)]
pub struct RecordingBackend {
    pub fail_on: Option<String>,
    pub cancel_after_first: Option<CancellationToken>,
    pub config: Mutex<Option<DbConfig>>,
    pub calls: Mutex<Vec<GenerateCall>>,
}

impl RecordingBackend {
    pub fn failing_on(table: &str) -> Self {
        Self {
            fail_on: Some(table.to_string()),
            ..Self::default()
        }
    }

    pub fn tables(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.table.table.id.clone())
            .collect()
    }

    pub fn call(&self, table: &str) -> GenerateCall {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.table.table.id == table)
            .cloned()
            .unwrap()
    }
}

#[async_trait]
impl CodeBackend for RecordingBackend {
    fn extension(&self) -> &str {
        "txt"
    }

    fn set_config(&self, config: &DbConfig) {
        *self.config.lock().unwrap() = Some(config.clone());
    }

    async fn generate_table(
        &self,
        table: &TableDetail,
        columns: &[Column],
        references: &[TableReference],
        output: &dyn OutputTarget,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(GenerateCall {
            table: table.clone(),
            columns: columns.to_vec(),
            references: references.to_vec(),
            location: output.location(),
        });

        if let Some(token) = &self.cancel_after_first {
            token.cancel();
        }

        if self.fail_on.as_deref() == Some(table.table.id.as_str()) {
            return Err(Error::Render("template exploded".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Total(u64),
    Advance(u64),
    Start,
    Finish,
}

/// Records progress calls in order, optionally failing start or finish
#[derive(Default)]
pub struct RecordingProgress {
    pub fail_on_start: bool,
    pub fail_on_finish: bool,
    pub events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn started(&self) -> bool {
        self.events().contains(&ProgressEvent::Start)
    }

    pub fn finished(&self) -> bool {
        self.events().contains(&ProgressEvent::Finish)
    }
}

impl Progress for RecordingProgress {
    fn set_total(&self, total: u64) {
        self.events.lock().unwrap().push(ProgressEvent::Total(total));
    }

    fn advance(&self, delta: u64) {
        self.events.lock().unwrap().push(ProgressEvent::Advance(delta));
    }

    fn start(&self) -> Result<()> {
        if self.fail_on_start {
            return Err(Error::Progress("terminal unavailable".to_string()));
        }
        self.events.lock().unwrap().push(ProgressEvent::Start);
        Ok(())
    }

    fn finish(&self) -> Result<()> {
        if self.fail_on_finish {
            return Err(Error::Progress("terminal closed".to_string()));
        }
        self.events.lock().unwrap().push(ProgressEvent::Finish);
        Ok(())
    }
}
