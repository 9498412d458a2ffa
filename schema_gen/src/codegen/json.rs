//! JSON backend
//!
//! Writes the resolved definition of each table as a JSON document.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::{PoisonError, RwLock};

use crate::codegen::{write_output, CodeBackend};
use crate::error::Result;
use crate::files::OutputTarget;
use crate::schema::{Column, DbConfig, TableDetail, TableReference};

#[derive(Serialize)]
struct TableDocument<'a> {
    config: &'a DbConfig,
    #[serde(flatten)]
    table: &'a TableDetail,
    columns: &'a [Column],
    references: &'a [TableReference],
}

/// Dumps resolved tables as pretty-printed JSON
#[derive(Debug, Default)]
pub struct JsonBackend {
    config: RwLock<DbConfig>,
}

impl JsonBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render_table(
        &self,
        table: &TableDetail,
        columns: &[Column],
        references: &[TableReference],
    ) -> Result<Vec<u8>> {
        let config = self
            .config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut json = serde_json::to_vec_pretty(&TableDocument {
            config: &config,
            table,
            columns,
            references,
        })?;
        json.push(b'\n');

        Ok(json)
    }
}

#[async_trait]
impl CodeBackend for JsonBackend {
    fn extension(&self) -> &str {
        "json"
    }

    fn set_config(&self, config: &DbConfig) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config.clone();
    }

    async fn generate_table(
        &self,
        table: &TableDetail,
        columns: &[Column],
        references: &[TableReference],
        output: &dyn OutputTarget,
    ) -> Result<()> {
        let json = self.render_table(table, columns, references)?;
        write_output(output, &json).await
    }
}
