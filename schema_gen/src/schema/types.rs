//! Type definitions for schema objects
//!
//! These are the resolved types: every enumerated option already carries its
//! concrete value. The loader is the only place that sees unset options.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Database management system the schema targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dbms {
    #[default]
    #[serde(rename = "mysql")]
    MySql,
}

impl Dbms {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dbms::MySql => "mysql",
        }
    }
}

/// Schema-wide settings from the `config` section
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DbConfig {
    pub dbms: Dbms,
    pub version: String,
    pub database: String,
}

/// Storage format of a column's data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnFormat {
    Fixed,
    /// Variable-length storage
    #[default]
    Dynamic,
}

impl ColumnFormat {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnFormat::Fixed => "FIXED",
            ColumnFormat::Dynamic => "DYNAMIC",
        }
    }
}

/// Where a column is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Storage {
    #[default]
    Disk,
    Memory,
}

impl Storage {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Storage::Disk => "DISK",
            Storage::Memory => "MEMORY",
        }
    }
}

/// Foreign key match mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Every referencing column must be non-null
    Full,
    /// Recognised but not enforced by MySQL
    Partial,
    /// Nullable match
    #[default]
    Simple,
}

impl MatchType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            MatchType::Full => "FULL",
            MatchType::Partial => "PARTIAL",
            MatchType::Simple => "SIMPLE",
        }
    }
}

/// Action taken on a referencing row when the referenced row changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceOption {
    #[default]
    Restrict,
    Cascade,
    SetNull,
    NoAction,
}

impl ReferenceOption {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ReferenceOption::Restrict => "RESTRICT",
            ReferenceOption::Cascade => "CASCADE",
            ReferenceOption::SetNull => "SET NULL",
            ReferenceOption::NoAction => "NO ACTION",
        }
    }
}

/// Index method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexType {
    #[default]
    Btree,
    Hash,
}

impl IndexType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            IndexType::Btree => "BTREE",
            IndexType::Hash => "HASH",
        }
    }
}

/// Sort direction of an indexed column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexDirection {
    #[default]
    Asc,
    Desc,
}

impl IndexDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            IndexDirection::Asc => "ASC",
            IndexDirection::Desc => "DESC",
        }
    }
}

/// Supported column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeName {
    Tinyint,
    Smallint,
    Mediumint,
    Int,
    Bigint,
    Float,
    Double,
    Decimal,
    Bit,
    Bool,
    Char,
    Varchar,
    Binary,
    Varbinary,
    Tinytext,
    Text,
    Mediumtext,
    Longtext,
    Tinyblob,
    Blob,
    Mediumblob,
    Longblob,
    Date,
    Time,
    Datetime,
    Timestamp,
    Year,
    Json,
}

impl TypeName {
    pub fn as_sql(&self) -> &'static str {
        match self {
            TypeName::Tinyint => "TINYINT",
            TypeName::Smallint => "SMALLINT",
            TypeName::Mediumint => "MEDIUMINT",
            TypeName::Int => "INT",
            TypeName::Bigint => "BIGINT",
            TypeName::Float => "FLOAT",
            TypeName::Double => "DOUBLE",
            TypeName::Decimal => "DECIMAL",
            TypeName::Bit => "BIT",
            TypeName::Bool => "BOOL",
            TypeName::Char => "CHAR",
            TypeName::Varchar => "VARCHAR",
            TypeName::Binary => "BINARY",
            TypeName::Varbinary => "VARBINARY",
            TypeName::Tinytext => "TINYTEXT",
            TypeName::Text => "TEXT",
            TypeName::Mediumtext => "MEDIUMTEXT",
            TypeName::Longtext => "LONGTEXT",
            TypeName::Tinyblob => "TINYBLOB",
            TypeName::Blob => "BLOB",
            TypeName::Mediumblob => "MEDIUMBLOB",
            TypeName::Longblob => "LONGBLOB",
            TypeName::Date => "DATE",
            TypeName::Time => "TIME",
            TypeName::Datetime => "DATETIME",
            TypeName::Timestamp => "TIMESTAMP",
            TypeName::Year => "YEAR",
            TypeName::Json => "JSON",
        }
    }
}

/// A column type with its optional length or precision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnType {
    pub name: TypeName,
    pub length: Option<u32>,
}

impl ColumnType {
    pub fn new(name: TypeName) -> Self {
        Self { name, length: None }
    }

    /// Set the length or precision parameter
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }
}

/// Per-column storage options
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Extra {
    pub auto_increment: bool,
    pub unique: bool,
    pub format: ColumnFormat,
    pub storage: Storage,
}

impl Extra {
    /// True when every field holds its default value
    pub fn is_default(&self) -> bool {
        *self == Extra::default()
    }
}

/// One column of an index, primary key or reference target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexColumn {
    pub name: String,
    /// Prefix length
    pub length: Option<u32>,
    pub direction: IndexDirection,
}

impl IndexColumn {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            length: None,
            direction: IndexDirection::default(),
        }
    }
}

/// Index options
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct IndexOption {
    pub index_type: IndexType,
    pub key_block_size: Option<u32>,
    pub parser: Option<String>,
}

/// Primary key of a table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PrimaryKey {
    pub columns: Vec<IndexColumn>,
    pub options: Option<IndexOption>,
}

impl PrimaryKey {
    /// Column names in index order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name.clone()).collect()
    }
}

/// An outgoing foreign key declared on a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// Target table identifier
    pub table: String,
    pub match_type: MatchType,
    pub on_delete: ReferenceOption,
    pub on_update: ReferenceOption,
    pub columns: Vec<IndexColumn>,
}

impl Reference {
    /// Create a reference to `table` with default match mode and actions
    pub fn new(table: &str, columns: Vec<IndexColumn>) -> Self {
        Self {
            table: table.to_string(),
            match_type: MatchType::default(),
            on_delete: ReferenceOption::default(),
            on_update: ReferenceOption::default(),
            columns,
        }
    }
}

/// Represents a table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub id: String,
    pub description: String,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub null: bool,
    pub default: Option<String>,
    pub extra: Option<Extra>,
    pub references: Vec<Reference>,
}

impl Column {
    /// Create a new column whose name equals its identifier
    pub fn new(id: &str, column_type: ColumnType) -> Self {
        Self {
            id: id.to_string(),
            description: String::new(),
            name: id.to_string(),
            column_type,
            null: false,
            default: None,
            extra: None,
            references: Vec::new(),
        }
    }

    /// Set whether the column is nullable
    pub fn nullable(mut self, null: bool) -> Self {
        self.null = null;
        self
    }

    /// Set the extra block
    pub fn extra(mut self, extra: Extra) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Add an outgoing reference
    pub fn reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    pub fn format(&self) -> ColumnFormat {
        self.extra.as_ref().map(|extra| extra.format).unwrap_or_default()
    }

    pub fn storage(&self) -> Storage {
        self.extra.as_ref().map(|extra| extra.storage).unwrap_or_default()
    }

    pub fn is_auto_increment(&self) -> bool {
        self.extra.as_ref().is_some_and(|extra| extra.auto_increment)
    }

    pub fn is_unique(&self) -> bool {
        self.extra.as_ref().is_some_and(|extra| extra.unique)
    }
}

/// Table metadata without its columns
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TableMeta {
    /// Identifier used for references and file naming
    pub id: String,
    pub description: String,
    /// Name of the table in the database
    pub name: String,
    pub engine: Option<String>,
    pub char_set: Option<String>,
    pub max_rows: Option<u64>,
    pub min_rows: Option<u64>,
    pub avg_row_length: Option<u64>,
}

impl TableMeta {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// Represents a table declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    #[serde(flatten)]
    pub meta: TableMeta,
    pub primary_key: Option<PrimaryKey>,
    pub columns: Vec<Column>,
}

impl Table {
    /// Create a new table with the given identifier and database name
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            meta: TableMeta::new(id, name),
            primary_key: None,
            columns: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.meta.id
    }

    /// Add a column to the table
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Set the primary key for the table
    pub fn set_primary_key(&mut self, pk: PrimaryKey) {
        self.primary_key = Some(pk);
    }
}

/// A loaded schema: settings plus tables in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Schema {
    pub config: DbConfig,
    pub tables: IndexMap<String, Table>,
}

impl Schema {
    /// Create a new schema without tables
    pub fn new(config: DbConfig) -> Self {
        Self {
            config,
            tables: IndexMap::new(),
        }
    }

    /// Add a table to the schema, keeping declaration order
    pub fn add_table(&mut self, table: Table) {
        self.tables.insert(table.meta.id.clone(), table);
    }

    pub fn contains_table(&self, id: &str) -> bool {
        self.tables.contains_key(id)
    }

    pub fn table(&self, id: &str) -> Option<&Table> {
        self.tables.get(id)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
