//! Migration Builder - DDL generation from declared schemas
//!
//! Pure translation from schema values to SQL text; no I/O and no state.
//! Every statement is guarded with `IF NOT EXISTS` where the dialect allows
//! it, as a second line of defense beyond the runner's own existence checks.

use crate::schema::{ColumnDefinition, ColumnType, DefaultValue, IndexDefinition, TableSchema};

/// Dialect-specific DDL generation
pub trait MigrationBuilder: Send + Sync {
    /// Build a `CREATE TABLE IF NOT EXISTS` statement for the whole schema
    fn build_create_table(&self, schema: &TableSchema) -> String;

    /// Build an `ALTER TABLE ... ADD COLUMN` statement for one column
    fn build_add_column(&self, table: &str, column: &ColumnDefinition) -> String;

    /// Build one `ADD COLUMN` statement per column, in order.
    ///
    /// SQLite (like several engines) does not allow multiple columns in a
    /// single `ALTER TABLE`, so this is always one statement per column.
    fn build_add_columns(&self, table: &str, columns: &[ColumnDefinition]) -> Vec<String> {
        columns
            .iter()
            .map(|column| self.build_add_column(table, column))
            .collect()
    }

    /// Build a `CREATE INDEX` statement for a declared index
    fn build_create_index(&self, table: &str, index: &IndexDefinition) -> String;
}

/// DDL generation for the SQLite dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteMigrationBuilder;

impl SqliteMigrationBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Native keyword for a portable column type.
    ///
    /// SQLite has no boolean or temporal storage classes; booleans use the
    /// 0/1 integer convention and datetimes are stored as ISO-8601 text.
    fn native_type(column_type: ColumnType) -> &'static str {
        match column_type {
            ColumnType::Integer => "INTEGER",
            ColumnType::Text => "TEXT",
            ColumnType::Real => "REAL",
            ColumnType::Blob => "BLOB",
            ColumnType::Boolean => "INTEGER",
            ColumnType::DateTime => "TEXT",
        }
    }

    /// Render a default as a SQL literal; embedded quotes are doubled
    fn render_default(value: &DefaultValue) -> String {
        match value {
            DefaultValue::Boolean(b) => {
                if *b {
                    "1".to_string()
                } else {
                    "0".to_string()
                }
            }
            DefaultValue::Integer(i) => i.to_string(),
            DefaultValue::Real(f) => f.to_string(),
            DefaultValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
        }
    }

    /// Render one column clause.
    ///
    /// Shared by `CREATE TABLE` and `ADD COLUMN` so the two can never drift
    /// apart in formatting. Clause order after the type keyword is fixed:
    /// `PRIMARY KEY [AUTOINCREMENT]`, `NOT NULL`, `UNIQUE`, `DEFAULT`.
    fn column_definition(column: &ColumnDefinition) -> String {
        let mut sql = format!("{} {}", column.name, Self::native_type(column.column_type));

        if column.primary_key {
            sql.push_str(" PRIMARY KEY");
            if column.auto_increment && column.column_type == ColumnType::Integer {
                sql.push_str(" AUTOINCREMENT");
            }
        }
        if !column.nullable {
            sql.push_str(" NOT NULL");
        }
        if column.unique {
            sql.push_str(" UNIQUE");
        }
        if let Some(default) = &column.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&Self::render_default(default));
        }

        sql
    }
}

impl MigrationBuilder for SqliteMigrationBuilder {
    fn build_create_table(&self, schema: &TableSchema) -> String {
        let columns: Vec<String> = schema.columns.iter().map(Self::column_definition).collect();

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            schema.name,
            columns.join(", ")
        )
    }

    fn build_add_column(&self, table: &str, column: &ColumnDefinition) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {}",
            table,
            Self::column_definition(column)
        )
    }

    fn build_create_index(&self, table: &str, index: &IndexDefinition) -> String {
        let unique = if index.unique { "UNIQUE " } else { "" };
        format!(
            "CREATE {}INDEX IF NOT EXISTS {} ON {} ({})",
            unique,
            index.name,
            table,
            index.columns.join(", ")
        )
    }
}
