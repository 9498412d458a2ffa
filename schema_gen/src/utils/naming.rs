//! Naming utilities for SchemaGen
//!
//! This module provides utilities for naming conventions, identifier quoting
//! and file names.

use inflector::Inflector;

use crate::schema::types::Dbms;

/// Apply a naming convention to a string
pub fn apply_naming_convention(name: &str, convention: &str) -> String {
    match convention {
        "snake_case" => name.to_snake_case(),
        "camel_case" => name.to_camel_case(),
        "pascal_case" => name.to_pascal_case(),
        "kebab_case" => name.to_kebab_case(),
        "screaming_snake_case" => name.to_screaming_snake_case(),
        _ => name.to_string(), // Default: keep as is
    }
}

/// Format a name according to a pattern with placeholders
pub fn format_name(pattern: &str, replacements: &[(&str, &str)]) -> String {
    let mut result = pattern.to_string();

    for (placeholder, value) in replacements {
        result = result.replace(&format!("{{{}}}", placeholder), value);
    }

    result
}

/// Get foreign key constraint name according to pattern
pub fn get_foreign_key_name(pattern: &str, table_name: &str, column_name: &str) -> String {
    format_name(pattern, &[("table", table_name), ("column", column_name)])
}

/// Truncate an identifier to fit database limits
pub fn truncate_identifier(name: &str, max_length: usize) -> String {
    if name.len() <= max_length {
        return name.to_string();
    }

    // Room for "_" plus 8 hash characters
    let keep_length = max_length.saturating_sub(9);
    let hash = format!("{:x}", md5::compute(name.as_bytes()));

    let mut cut = keep_length.min(name.len());
    while !name.is_char_boundary(cut) {
        cut -= 1;
    }

    format!("{}_{}", &name[..cut], &hash[0..8])
}

/// Get maximum identifier length for a database
pub fn get_max_identifier_length(dbms: Dbms) -> usize {
    match dbms {
        Dbms::MySql => 64,
    }
}

/// Quote an identifier for a database
pub fn format_sql_identifier(name: &str, dbms: Dbms) -> String {
    match dbms {
        Dbms::MySql => format!("`{}`", name.replace('`', "``")),
    }
}

/// Quote a string literal
pub fn format_sql_string(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
}

/// Format name as a valid file name
pub fn format_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}
