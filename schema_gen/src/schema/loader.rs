//! Schema loader
//!
//! Reads a YAML schema through a [`Reader`], decodes it and resolves every
//! unset option, producing an immutable [`Schema`].

use std::path::Path;

use crate::error::{Error, Result};
use crate::files::Reader;
use crate::schema::defaults::{non_zero, resolve, resolve_extra, resolve_primary_key, resolve_reference};
use crate::schema::document::{ColumnDocument, ConfigDocument, SchemaDocument, TableDocument};
use crate::schema::types::{Column, ColumnType, DbConfig, MatchType, Schema, Table, TableMeta};

/// Loads schema files through a reader capability
pub struct SchemaLoader<'a, R: Reader + ?Sized> {
    reader: &'a R,
}

impl<'a, R: Reader + ?Sized> SchemaLoader<'a, R> {
    /// Create a new schema loader
    pub fn new(reader: &'a R) -> Self {
        Self { reader }
    }

    /// Read, decode and resolve the schema at `path`
    pub async fn load(&self, path: &Path) -> Result<Schema> {
        if !self.reader.is_exist(path).await? {
            return Err(Error::SchemaNotFound(path.to_path_buf()));
        }

        let bytes = self.reader.read(path).await?;
        let schema = parse_slice(&bytes)?;

        tracing::debug!(path = %path.display(), tables = schema.len(), "Schema loaded");
        Ok(schema)
    }
}

/// Decode and resolve a schema from YAML text
pub fn parse_str(yaml: &str) -> Result<Schema> {
    parse_slice(yaml.as_bytes())
}

/// Decode and resolve a schema from raw YAML bytes
pub fn parse_slice(bytes: &[u8]) -> Result<Schema> {
    let document: SchemaDocument = if bytes.iter().all(u8::is_ascii_whitespace) {
        SchemaDocument::default()
    } else {
        serde_yaml::from_slice(bytes)?
    };

    let schema = resolve_document(document)?;
    warn_unchecked(&schema);

    Ok(schema)
}

/// Resolve a decoded document into a schema
pub fn resolve_document(document: SchemaDocument) -> Result<Schema> {
    let mut schema = Schema::new(resolve_config(document.config));

    for table in document.tables {
        if schema.contains_table(&table.id) {
            return Err(Error::SchemaDecode(format!(
                "duplicate table id `{}`",
                table.id
            )));
        }
        schema.add_table(resolve_table(table));
    }

    Ok(schema)
}

fn resolve_config(doc: Option<ConfigDocument>) -> DbConfig {
    let doc = doc.unwrap_or_default();

    DbConfig {
        dbms: resolve(doc.dbms),
        version: doc.version.unwrap_or_default(),
        database: doc.database.unwrap_or_default(),
    }
}

fn resolve_table(doc: TableDocument) -> Table {
    let name = if doc.name.is_empty() { doc.id.clone() } else { doc.name };

    Table {
        meta: TableMeta {
            id: doc.id,
            description: doc.description,
            name,
            engine: doc.engine,
            char_set: doc.char_set,
            max_rows: non_zero(doc.max_rows),
            min_rows: non_zero(doc.min_rows),
            avg_row_length: non_zero(doc.avg_row_length),
        },
        primary_key: doc.primary_key.map(resolve_primary_key),
        columns: doc.columns.into_iter().map(resolve_column).collect(),
    }
}

fn resolve_column(doc: ColumnDocument) -> Column {
    let name = if doc.name.is_empty() { doc.id.clone() } else { doc.name };

    Column {
        id: doc.id,
        description: doc.description,
        name,
        column_type: ColumnType {
            name: doc.column_type.name,
            length: non_zero(doc.column_type.length),
        },
        null: doc.null,
        default: doc.default,
        extra: doc.extra.map(resolve_extra),
        references: doc.reference.into_iter().map(resolve_reference).collect(),
    }
}

/// Log references the generator may not be able to honour
fn warn_unchecked(schema: &Schema) {
    for table in schema.tables.values() {
        for column in &table.columns {
            for reference in &column.references {
                if !schema.contains_table(&reference.table) {
                    tracing::warn!(
                        table = table.id(),
                        column = %column.id,
                        target = %reference.table,
                        "Reference targets a table that is not declared in the schema"
                    );
                }
                if reference.match_type == MatchType::Partial {
                    tracing::warn!(
                        table = table.id(),
                        column = %column.id,
                        "MATCH PARTIAL is parsed but not enforced by MySQL"
                    );
                }
            }
        }
    }
}
