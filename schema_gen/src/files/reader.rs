//! Schema file reading

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;

/// Byte-level access to the schema source
#[async_trait]
pub trait Reader: Send + Sync {
    /// Check whether `path` exists
    async fn is_exist(&self, path: &Path) -> Result<bool>;

    /// Read the whole file at `path`
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Reader backed by the local filesystem
#[derive(Debug, Clone, Default)]
pub struct FsReader;

impl FsReader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Reader for FsReader {
    async fn is_exist(&self, path: &Path) -> Result<bool> {
        Ok(tokio::fs::try_exists(path).await?)
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(path).await?)
    }
}
