//! Per-table output destinations

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWrite;

use crate::config::NamingConfig;
use crate::error::Result;
use crate::utils::naming::{apply_naming_convention, format_file_name};

/// Writable stream handed to a code backend
pub type OutputStream = Box<dyn AsyncWrite + Send + Unpin>;

/// Factory for the output stream of one table
#[async_trait]
pub trait OutputTarget: Send + Sync {
    /// Human readable location, used in logs
    fn location(&self) -> String;

    /// Open a fresh stream, truncating anything written before
    async fn open(&self) -> Result<OutputStream>;
}

/// Acquires output destinations for tables
#[async_trait]
pub trait Writer: Send + Sync {
    async fn open_for_table(
        &self,
        table_id: &str,
        root: &Path,
        extension: &str,
    ) -> Result<Box<dyn OutputTarget>>;
}

/// Writes one file per table below an output root
#[derive(Debug, Clone)]
pub struct FileWriter {
    file_style: String,
}

impl FileWriter {
    pub fn new(naming: &NamingConfig) -> Self {
        Self {
            file_style: naming.file_style.clone(),
        }
    }

    /// File name for a table, without directory
    pub fn file_name(&self, table_id: &str, extension: &str) -> String {
        let stem = format_file_name(&apply_naming_convention(table_id, &self.file_style));
        let extension = extension.trim_start_matches('.');

        if extension.is_empty() {
            stem
        } else {
            format!("{}.{}", stem, extension)
        }
    }
}

impl Default for FileWriter {
    fn default() -> Self {
        Self::new(&NamingConfig::default())
    }
}

#[async_trait]
impl Writer for FileWriter {
    async fn open_for_table(
        &self,
        table_id: &str,
        root: &Path,
        extension: &str,
    ) -> Result<Box<dyn OutputTarget>> {
        tokio::fs::create_dir_all(root).await?;

        let path = root.join(self.file_name(table_id, extension));
        tracing::debug!(table = table_id, path = %path.display(), "Output file prepared");

        Ok(Box::new(FileTarget::new(path)))
    }
}

/// A file on disk
#[derive(Debug, Clone)]
pub struct FileTarget {
    path: PathBuf,
}

impl FileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl OutputTarget for FileTarget {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn open(&self) -> Result<OutputStream> {
        let file = tokio::fs::File::create(&self.path).await?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::tempdir;
    use tokio::io::AsyncWriteExt;

    #[rstest]
    #[case("snake_case", "UserProfile", "sql", "user_profile.sql")]
    #[case("kebab_case", "user_profile", ".sql", "user-profile.sql")]
    #[case("none", "user", "", "user")]
    fn test_file_name(
        #[case] style: &str,
        #[case] table_id: &str,
        #[case] extension: &str,
        #[case] expected: &str,
    ) {
        let writer = FileWriter::new(&NamingConfig {
            file_style: style.to_string(),
        });

        assert_eq!(writer.file_name(table_id, extension), expected);
    }

    #[tokio::test]
    async fn test_open_for_table_creates_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("out").join("ddl");

        let target = FileWriter::default()
            .open_for_table("user", &root, "sql")
            .await
            .unwrap();

        let mut stream = target.open().await.unwrap();
        stream.write_all(b"CREATE TABLE").await.unwrap();
        stream.shutdown().await.unwrap();

        let written = std::fs::read_to_string(root.join("user.sql")).unwrap();
        assert_eq!(written, "CREATE TABLE");
    }

    #[tokio::test]
    async fn test_file_target_truncates_previous_contents() {
        let dir = tempdir().unwrap();
        let target = FileTarget::new(dir.path().join("user.sql"));
        std::fs::write(target.path(), "stale contents").unwrap();

        let mut stream = target.open().await.unwrap();
        stream.write_all(b"fresh").await.unwrap();
        stream.shutdown().await.unwrap();

        assert_eq!(std::fs::read_to_string(target.path()).unwrap(), "fresh");
        assert_eq!(target.location(), target.path().display().to_string());
    }

    #[tokio::test]
    async fn test_open_for_table_fails_when_root_is_a_file() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("taken");
        std::fs::write(&root, "").unwrap();

        let result = FileWriter::default().open_for_table("user", &root, "sql").await;

        assert!(result.is_err());
    }
}
