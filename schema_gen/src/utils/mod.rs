//! Utilities for SchemaGen
//!
//! This module provides utility functions used across the library.

pub mod logging;
pub mod naming;

// Re-export key utility functions
pub use naming::{
    apply_naming_convention, format_file_name, format_sql_identifier, format_sql_string,
    get_foreign_key_name, truncate_identifier,
};
