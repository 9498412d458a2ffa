//! MySQL DDL backend
//!
//! Renders one `CREATE TABLE` statement per table.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::codegen::{write_output, CodeBackend};
use crate::error::{Error, Result};
use crate::files::OutputTarget;
use crate::schema::{
    Column, ColumnFormat, DbConfig, IndexColumn, IndexDirection, PrimaryKey, Storage, TableDetail,
    TableReference,
};
use crate::utils::naming::{
    format_sql_identifier, format_sql_string, get_foreign_key_name, get_max_identifier_length,
    truncate_identifier,
};

const FOREIGN_KEY_PATTERN: &str = "fk_{table}_{column}";

/// MySQL `CREATE TABLE` generator
#[derive(Debug, Default)]
pub struct MySqlBackend {
    config: RwLock<DbConfig>,
}

impl MySqlBackend {
    /// Create a new MySQL backend
    pub fn new() -> Self {
        Self::default()
    }

    fn config(&self) -> DbConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Render the DDL for one table
    pub fn render_table(
        &self,
        table: &TableDetail,
        columns: &[Column],
        references: &[TableReference],
    ) -> Result<String> {
        let config = self.config();
        let meta = &table.table;

        if columns.is_empty() {
            return Err(Error::Render(format!(
                "table `{}` declares no columns",
                meta.id
            )));
        }

        let mut sql = String::new();
        if config.version.is_empty() {
            sql.push_str("-- Generated by schema_gen for MySQL\n");
        } else {
            sql.push_str(&format!(
                "-- Generated by schema_gen for MySQL {}\n",
                config.version
            ));
        }
        sql.push_str(&format!(
            "CREATE TABLE IF NOT EXISTS {} (\n",
            self.table_identifier(&config, &meta.name)
        ));

        let mut column_defs: Vec<String> = columns
            .iter()
            .map(|column| format!("  {}", self.column_definition(&config, column)))
            .collect();

        if let Some(pk) = &table.primary_key {
            if !pk.columns.is_empty() {
                column_defs.push(format!("  {}", self.primary_key_definition(&config, pk)));
            }
        }

        let mut per_column: HashMap<&str, usize> = HashMap::new();
        for reference in references {
            *per_column.entry(reference.column.as_str()).or_default() += 1;
        }
        let mut seen: HashMap<&str, usize> = HashMap::new();

        for reference in references {
            let ordinal = seen.entry(reference.column.as_str()).or_default();
            *ordinal += 1;
            let ordinal = (per_column[reference.column.as_str()] > 1).then_some(*ordinal);

            column_defs.push(format!(
                "  {}",
                self.foreign_key_definition(&config, &meta.name, reference, ordinal)?
            ));
        }

        sql.push_str(&column_defs.join(",\n"));

        // Add table options
        let mut table_options = Vec::new();
        if let Some(engine) = &meta.engine {
            table_options.push(format!("ENGINE={}", engine));
        }
        if let Some(char_set) = &meta.char_set {
            table_options.push(format!("DEFAULT CHARSET={}", char_set));
        }
        if let Some(max_rows) = meta.max_rows {
            table_options.push(format!("MAX_ROWS={}", max_rows));
        }
        if let Some(min_rows) = meta.min_rows {
            table_options.push(format!("MIN_ROWS={}", min_rows));
        }
        if let Some(avg_row_length) = meta.avg_row_length {
            table_options.push(format!("AVG_ROW_LENGTH={}", avg_row_length));
        }
        if !meta.description.is_empty() {
            table_options.push(format!("COMMENT={}", format_sql_string(&meta.description)));
        }

        if table_options.is_empty() {
            sql.push_str("\n);\n");
        } else {
            sql.push_str(&format!("\n) {};\n", table_options.join(" ")));
        }

        Ok(sql)
    }

    fn table_identifier(&self, config: &DbConfig, name: &str) -> String {
        let table = format_sql_identifier(name, config.dbms);

        if config.database.is_empty() {
            table
        } else {
            format!("{}.{}", format_sql_identifier(&config.database, config.dbms), table)
        }
    }

    fn column_definition(&self, config: &DbConfig, column: &Column) -> String {
        let mut def = format!(
            "{} {}",
            format_sql_identifier(&column.name, config.dbms),
            column.column_type.name.as_sql()
        );
        if let Some(length) = column.column_type.length {
            def.push_str(&format!("({})", length));
        }

        def.push_str(if column.null { " NULL" } else { " NOT NULL" });

        if let Some(default) = &column.default {
            def.push_str(&format!(" DEFAULT {}", format_default(default)));
        }
        if column.is_auto_increment() {
            def.push_str(" AUTO_INCREMENT");
        }
        if column.is_unique() {
            def.push_str(" UNIQUE");
        }
        if !column.description.is_empty() {
            def.push_str(&format!(" COMMENT {}", format_sql_string(&column.description)));
        }
        if column.format() != ColumnFormat::default() {
            def.push_str(&format!(" COLUMN_FORMAT {}", column.format().as_sql()));
        }
        if column.storage() != Storage::default() {
            def.push_str(&format!(" STORAGE {}", column.storage().as_sql()));
        }

        def
    }

    fn key_parts(&self, config: &DbConfig, columns: &[IndexColumn]) -> String {
        columns
            .iter()
            .map(|column| {
                let mut part = format_sql_identifier(&column.name, config.dbms);
                if let Some(length) = column.length {
                    part.push_str(&format!("({})", length));
                }
                if column.direction == IndexDirection::Desc {
                    part.push_str(" DESC");
                }
                part
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn primary_key_definition(&self, config: &DbConfig, pk: &PrimaryKey) -> String {
        let mut def = format!("PRIMARY KEY ({})", self.key_parts(config, &pk.columns));

        if let Some(options) = &pk.options {
            def.push_str(&format!(" USING {}", options.index_type.as_sql()));
            if let Some(size) = options.key_block_size {
                def.push_str(&format!(" KEY_BLOCK_SIZE={}", size));
            }
            if let Some(parser) = &options.parser {
                def.push_str(&format!(" WITH PARSER {}", parser));
            }
        }

        def
    }

    fn foreign_key_definition(
        &self,
        config: &DbConfig,
        table_name: &str,
        reference: &TableReference,
        ordinal: Option<usize>,
    ) -> Result<String> {
        let target = reference.table_name.as_deref().ok_or_else(|| {
            Error::Render(format!(
                "column `{}` references unknown table `{}`",
                reference.column, reference.table
            ))
        })?;

        if reference.columns.is_empty() {
            return Err(Error::Render(format!(
                "reference from column `{}` to table `{}` names no columns",
                reference.column, reference.table
            )));
        }

        let mut name = get_foreign_key_name(FOREIGN_KEY_PATTERN, table_name, &reference.column_name);
        if let Some(ordinal) = ordinal {
            name = format!("{}_{}", name, ordinal);
        }
        let name = truncate_identifier(&name, get_max_identifier_length(config.dbms));

        Ok(format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) MATCH {} ON DELETE {} ON UPDATE {}",
            format_sql_identifier(&name, config.dbms),
            format_sql_identifier(&reference.column_name, config.dbms),
            self.table_identifier(config, target),
            self.key_parts(config, &reference.columns),
            reference.match_type.as_sql(),
            reference.on_delete.as_sql(),
            reference.on_update.as_sql()
        ))
    }
}

/// Keep numbers, keywords, expressions and quoted literals as written; quote the rest
fn format_default(value: &str) -> String {
    let upper = value.to_uppercase();

    if is_numeric_literal(value)
        || matches!(upper.as_str(), "NULL" | "TRUE" | "FALSE")
        || upper.starts_with("CURRENT_TIMESTAMP")
        || (value.starts_with('(') && value.ends_with(')'))
        || (value.len() >= 2 && value.starts_with('\'') && value.ends_with('\''))
    {
        value.to_string()
    } else {
        format_sql_string(value)
    }
}

/// Decimal literal such as `0`, `-1.5` or `.25`; `inf` and `nan` are not
fn is_numeric_literal(value: &str) -> bool {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    let digits = digits.strip_prefix('.').unwrap_or(digits);

    digits.starts_with(|c: char| c.is_ascii_digit()) && value.parse::<f64>().is_ok()
}

#[async_trait]
impl CodeBackend for MySqlBackend {
    fn extension(&self) -> &str {
        "sql"
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
        let sql = self.render_table(table, columns, references)?;
        write_output(output, sql.as_bytes()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{
        ColumnType, Extra, IndexOption, IndexType, MatchType, ReferenceOption, TableMeta, TypeName,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn users() -> (TableDetail, Vec<Column>) {
        let mut meta = TableMeta::new("user", "users");
        meta.description = "User accounts".to_string();
        meta.engine = Some("InnoDB".to_string());
        meta.char_set = Some("utf8mb4".to_string());

        let pk = PrimaryKey {
            columns: vec![IndexColumn::new("id")],
            options: None,
        };
        let detail = TableDetail {
            table: meta,
            primary_key_columns: pk.column_names(),
            primary_key: Some(pk),
        };

        let mut id = Column::new("id", ColumnType::new(TypeName::Int).with_length(11)).extra(Extra {
            auto_increment: true,
            ..Extra::default()
        });
        id.description = "User ID".to_string();
        let name = Column::new("name", ColumnType::new(TypeName::Varchar).with_length(64))
            .nullable(true);

        (detail, vec![id, name])
    }

    fn reference_to_users(column: &str) -> TableReference {
        TableReference {
            column: column.to_string(),
            column_name: column.to_string(),
            table: "user".to_string(),
            table_name: Some("users".to_string()),
            match_type: MatchType::Simple,
            on_delete: ReferenceOption::Restrict,
            on_update: ReferenceOption::Restrict,
            columns: vec![IndexColumn::new("id")],
        }
    }

    #[test]
    fn test_render_create_table() {
        let backend = MySqlBackend::new();
        let (detail, columns) = users();

        let sql = backend.render_table(&detail, &columns, &[]).unwrap();

        assert_eq!(
            sql,
            "-- Generated by schema_gen for MySQL\n\
             CREATE TABLE IF NOT EXISTS `users` (\n\
             \x20 `id` INT(11) NOT NULL AUTO_INCREMENT COMMENT 'User ID',\n\
             \x20 `name` VARCHAR(64) NULL,\n\
             \x20 PRIMARY KEY (`id`)\n\
             ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COMMENT='User accounts';\n"
        );
    }

    #[test]
    fn test_render_qualifies_with_database() {
        let backend = MySqlBackend::new();
        backend.set_config(&DbConfig {
            version: "8.0".to_string(),
            database: "chat".to_string(),
            ..DbConfig::default()
        });

        let detail = TableDetail {
            table: TableMeta::new("message", "messages"),
            primary_key: None,
            primary_key_columns: Vec::new(),
        };
        let columns = vec![Column::new("user_id", ColumnType::new(TypeName::Int))];

        let sql = backend
            .render_table(&detail, &columns, &[reference_to_users("user_id")])
            .unwrap();

        assert!(sql.starts_with("-- Generated by schema_gen for MySQL 8.0\n"));
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS `chat`.`messages` ("));
        assert!(sql.contains(
            "CONSTRAINT `fk_messages_user_id` FOREIGN KEY (`user_id`) REFERENCES `chat`.`users` (`id`) \
             MATCH SIMPLE ON DELETE RESTRICT ON UPDATE RESTRICT"
        ));
        assert!(sql.ends_with("\n);\n"));
    }

    #[test]
    fn test_render_primary_key_options() {
        let backend = MySqlBackend::new();
        let (mut detail, columns) = users();
        detail.primary_key = Some(PrimaryKey {
            columns: vec![
                IndexColumn {
                    length: Some(10),
                    ..IndexColumn::new("id")
                },
                IndexColumn {
                    direction: IndexDirection::Desc,
                    ..IndexColumn::new("name")
                },
            ],
            options: Some(IndexOption {
                index_type: IndexType::Hash,
                key_block_size: Some(8),
                parser: Some("ngram".to_string()),
            }),
        });

        let sql = backend.render_table(&detail, &columns, &[]).unwrap();

        assert!(sql.contains(
            "PRIMARY KEY (`id`(10), `name` DESC) USING HASH KEY_BLOCK_SIZE=8 WITH PARSER ngram"
        ));
    }

    #[test]
    fn test_render_extra_storage() {
        let backend = MySqlBackend::new();
        let (detail, mut columns) = users();
        columns[1].extra = Some(Extra {
            unique: true,
            format: ColumnFormat::Fixed,
            storage: Storage::Memory,
            ..Extra::default()
        });
        columns[1].default = Some("anonymous".to_string());

        let sql = backend.render_table(&detail, &columns, &[]).unwrap();

        assert!(sql.contains(
            "`name` VARCHAR(64) NULL DEFAULT 'anonymous' UNIQUE COLUMN_FORMAT FIXED STORAGE MEMORY,"
        ));
    }

    #[test]
    fn test_render_numbers_duplicate_constraints() {
        let backend = MySqlBackend::new();
        let (detail, columns) = users();
        let mut second = reference_to_users("id");
        second.on_delete = ReferenceOption::Cascade;

        let sql = backend
            .render_table(&detail, &columns, &[reference_to_users("id"), second])
            .unwrap();

        assert!(sql.contains("CONSTRAINT `fk_users_id_1`"));
        assert!(sql.contains("CONSTRAINT `fk_users_id_2`"));
        assert!(sql.contains("ON DELETE CASCADE"));
    }

    #[test]
    fn test_unknown_reference_target_fails() {
        let backend = MySqlBackend::new();
        let (detail, columns) = users();
        let mut reference = reference_to_users("id");
        reference.table = "room".to_string();
        reference.table_name = None;

        let result = backend.render_table(&detail, &columns, &[reference]);

        assert!(matches!(result, Err(Error::Render(_))));
    }

    #[test]
    fn test_table_without_columns_fails() {
        let backend = MySqlBackend::new();
        let (detail, _) = users();

        assert!(matches!(
            backend.render_table(&detail, &[], &[]),
            Err(Error::Render(_))
        ));
    }

    #[rstest]
    #[case("0", "0")]
    #[case("1.5", "1.5")]
    #[case("null", "null")]
    #[case("CURRENT_TIMESTAMP(6)", "CURRENT_TIMESTAMP(6)")]
    #[case("(UUID())", "(UUID())")]
    #[case("'quoted'", "'quoted'")]
    #[case("it's", "'it''s'")]
    #[case("-3", "-3")]
    #[case(".5", ".5")]
    #[case("inf", "'inf'")]
    #[case("NaN", "'NaN'")]
    #[case("-infinity", "'-infinity'")]
    #[case("'abc", "'''abc'")]
    #[case("(now", "'(now'")]
    fn test_format_default(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(format_default(input), expected);
    }
}
