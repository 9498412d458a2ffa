//! Default resolution
//!
//! Turns unset options from a decoded document into their concrete defaults.
//! Every function here is pure; the loader calls them exactly once per value.

use crate::schema::document::{
    ExtraDocument, IndexColumnDocument, IndexOptionDocument, PrimaryKeyDocument, ReferenceDocument,
};
use crate::schema::types::{Extra, IndexColumn, IndexOption, PrimaryKey, Reference};

/// Resolve an unset option to the type's default, pass set values through
pub fn resolve<T: Default>(value: Option<T>) -> T {
    value.unwrap_or_default()
}

/// Treat zero as an unset numeric hint
pub fn non_zero<T: Default + PartialEq>(value: Option<T>) -> Option<T> {
    value.filter(|v| *v != T::default())
}

pub fn resolve_extra(doc: ExtraDocument) -> Extra {
    Extra {
        auto_increment: doc.auto_increment,
        unique: doc.unique,
        format: resolve(doc.format),
        storage: resolve(doc.storage),
    }
}

pub fn resolve_index_column(doc: IndexColumnDocument) -> IndexColumn {
    IndexColumn {
        name: doc.name,
        length: non_zero(doc.length),
        direction: resolve(doc.direction),
    }
}

pub fn resolve_index_option(doc: IndexOptionDocument) -> IndexOption {
    IndexOption {
        index_type: resolve(doc.index_type),
        key_block_size: non_zero(doc.key_block_size),
        parser: doc.parser,
    }
}

pub fn resolve_primary_key(doc: PrimaryKeyDocument) -> PrimaryKey {
    PrimaryKey {
        columns: doc.columns.into_iter().map(resolve_index_column).collect(),
        options: doc.options.map(resolve_index_option),
    }
}

pub fn resolve_reference(doc: ReferenceDocument) -> Reference {
    Reference {
        table: doc.table,
        match_type: resolve(doc.match_type),
        on_delete: resolve(doc.on_delete),
        on_update: resolve(doc.on_update),
        columns: doc.columns.into_iter().map(resolve_index_column).collect(),
    }
}
