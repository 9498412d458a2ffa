//! Table queries over a loaded schema
//!
//! Read-only views rebuilt on every call. Unknown tables yield empty results
//! rather than errors.

use serde::Serialize;

use crate::schema::types::{
    Column, IndexColumn, MatchType, PrimaryKey, ReferenceOption, Schema, TableMeta,
};

/// A table paired with its primary-key column names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDetail {
    pub table: TableMeta,
    pub primary_key: Option<PrimaryKey>,
    /// Primary-key column names in index order, empty without a primary key
    pub primary_key_columns: Vec<String>,
}

/// One outgoing foreign key from a column of the queried table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableReference {
    /// Source column identifier
    pub column: String,
    /// Source column database name
    pub column_name: String,
    /// Target table identifier
    pub table: String,
    /// Target table database name, `None` when the target is not in the schema
    pub table_name: Option<String>,
    pub match_type: MatchType,
    pub on_delete: ReferenceOption,
    pub on_update: ReferenceOption,
    pub columns: Vec<IndexColumn>,
}

/// Query service over a loaded schema
#[derive(Debug, Clone, Copy)]
pub struct TableQuery<'a> {
    schema: &'a Schema,
}

impl<'a> TableQuery<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// All tables in schema order
    pub fn list_tables(&self) -> Vec<TableDetail> {
        self.schema
            .tables
            .values()
            .map(|table| TableDetail {
                table: table.meta.clone(),
                primary_key: table.primary_key.clone(),
                primary_key_columns: table
                    .primary_key
                    .as_ref()
                    .map(PrimaryKey::column_names)
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Columns of `table_id` in declared order
    pub fn get_columns(&self, table_id: &str) -> Vec<Column> {
        self.schema
            .table(table_id)
            .map(|table| table.columns.clone())
            .unwrap_or_default()
    }

    /// Outgoing references of `table_id`, in column then declaration order
    pub fn get_references(&self, table_id: &str) -> Vec<TableReference> {
        let schema = self.schema;
        let Some(table) = schema.table(table_id) else {
            return Vec::new();
        };

        table
            .columns
            .iter()
            .flat_map(|column| {
                column.references.iter().map(move |reference| TableReference {
                    column: column.id.clone(),
                    column_name: column.name.clone(),
                    table: reference.table.clone(),
                    table_name: schema
                        .table(&reference.table)
                        .map(|target| target.meta.name.clone()),
                    match_type: reference.match_type,
                    on_delete: reference.on_delete,
                    on_update: reference.on_update,
                    columns: reference.columns.clone(),
                })
            })
            .collect()
    }
}
