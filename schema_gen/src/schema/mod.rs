//! Schema module for SchemaGen
//!
//! This module holds the schema model, loads it from YAML and answers the
//! per-table questions generation needs.

pub mod defaults;
pub mod document;
pub mod loader;
pub mod query;
pub mod types;

// Re-export key types
pub use loader::{parse_str, SchemaLoader};
pub use query::{TableDetail, TableQuery, TableReference};
pub use types::{
    Column, ColumnFormat, ColumnType, DbConfig, Dbms, Extra, IndexColumn, IndexDirection,
    IndexOption, IndexType, MatchType, PrimaryKey, Reference, ReferenceOption, Schema, Storage,
    Table, TableMeta, TypeName,
};
