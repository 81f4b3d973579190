//! Schema Inspector - read-only reflection of the live database catalog
//!
//! Reports what actually exists in the database, shaped like the declared
//! model so the runner can diff the two directly. Absence ("table not
//! there", "no columns") is always a value, never an error; only genuine
//! connectivity failures propagate.

use std::sync::Arc;

use async_trait::async_trait;

use crate::backends::{DatabaseConnector, SqlValue};
use crate::error::SchemaResult;
use crate::schema::{ColumnDefinition, ColumnType, DefaultValue, IndexDefinition, TableSchema};

/// Dialect-specific catalog introspection
#[async_trait]
pub trait SchemaInspector: Send + Sync {
    /// Whether a table exists. Catalog errors collapse to `false` so
    /// callers never need error handling for "table not there yet".
    async fn table_exists(&self, name: &str) -> bool;

    /// All user table names, in catalog order
    async fn table_names(&self) -> SchemaResult<Vec<String>>;

    /// Column names of a table, in column order; empty if the table
    /// does not exist
    async fn table_columns(&self, name: &str) -> SchemaResult<Vec<String>>;

    /// Reconstruct a `TableSchema` from the catalog, or `None` if the
    /// table does not exist
    async fn table_schema(&self, name: &str) -> SchemaResult<Option<TableSchema>>;
}

/// Catalog introspection for SQLite, via `sqlite_master` and pragmas
pub struct SqliteSchemaInspector {
    connector: Arc<dyn DatabaseConnector>,
}

impl SqliteSchemaInspector {
    pub fn new(connector: Arc<dyn DatabaseConnector>) -> Self {
        Self { connector }
    }

    /// Map a native catalog type string onto the portable vocabulary.
    ///
    /// SQLite is permissive about declared types, so anything unrecognized
    /// falls back to `Text` instead of failing.
    fn infer_column_type(native: &str) -> ColumnType {
        let upper = native.trim().to_ascii_uppercase();
        if upper == "INTEGER" {
            ColumnType::Integer
        } else if upper == "TEXT" || upper.starts_with("VARCHAR") {
            ColumnType::Text
        } else if upper == "REAL" || upper == "DOUBLE" || upper == "FLOAT" {
            ColumnType::Real
        } else if upper == "BLOB" {
            ColumnType::Blob
        } else {
            ColumnType::Text
        }
    }

    /// Best-effort reverse of the builder's literal rendering
    fn parse_default(raw: &str) -> DefaultValue {
        if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
            let inner = &raw[1..raw.len() - 1];
            return DefaultValue::Text(inner.replace("''", "'"));
        }
        if let Ok(i) = raw.parse::<i64>() {
            return DefaultValue::Integer(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return DefaultValue::Real(f);
        }
        DefaultValue::Text(raw.to_string())
    }

    /// Unique constraints and declared indexes, reconstructed from
    /// `PRAGMA index_list`. Informational; not expected to round-trip
    /// the declared shape perfectly.
    async fn table_indexes(&self, table: &str) -> SchemaResult<Vec<IndexDefinition>> {
        let rows = self
            .connector
            .query(&format!("PRAGMA index_list({})", table), &[])
            .await?;

        let mut indexes = Vec::new();
        for row in rows {
            if row.text("origin") == Some("pk") {
                continue;
            }
            let name = match row.text("name") {
                Some(name) => name.to_string(),
                None => continue,
            };
            let unique = row.integer("unique").unwrap_or(0) != 0;

            let column_rows = self
                .connector
                .query(&format!("PRAGMA index_info({})", name), &[])
                .await?;
            let columns: Vec<String> = column_rows
                .iter()
                .filter_map(|r| r.text("name").map(str::to_string))
                .collect();

            let mut index = IndexDefinition::new(name, columns);
            if unique {
                index = index.unique();
            }
            indexes.push(index);
        }

        Ok(indexes)
    }
}

#[async_trait]
impl SchemaInspector for SqliteSchemaInspector {
    async fn table_exists(&self, name: &str) -> bool {
        let result = self
            .connector
            .query(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
                &[SqlValue::from(name)],
            )
            .await;

        match result {
            Ok(rows) => !rows.is_empty(),
            Err(error) => {
                tracing::debug!(table = name, %error, "catalog lookup failed");
                false
            }
        }
    }

    async fn table_names(&self) -> SchemaResult<Vec<String>> {
        let rows = self
            .connector
            .query(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
                &[],
            )
            .await?;

        Ok(rows
            .iter()
            .filter_map(|row| row.text("name").map(str::to_string))
            .collect())
    }

    async fn table_columns(&self, name: &str) -> SchemaResult<Vec<String>> {
        let rows = self
            .connector
            .query(&format!("PRAGMA table_info({})", name), &[])
            .await?;

        Ok(rows
            .iter()
            .filter_map(|row| row.text("name").map(str::to_string))
            .collect())
    }

    async fn table_schema(&self, name: &str) -> SchemaResult<Option<TableSchema>> {
        let rows = self
            .connector
            .query(&format!("PRAGMA table_info({})", name), &[])
            .await?;

        if rows.is_empty() {
            return Ok(None);
        }

        let mut schema = TableSchema::new(name);
        for row in rows {
            let column_name = match row.text("name") {
                Some(column_name) => column_name.to_string(),
                None => continue,
            };
            let native_type = row.text("type").unwrap_or_default();

            let mut column =
                ColumnDefinition::new(column_name, Self::infer_column_type(native_type));
            if row.integer("pk").unwrap_or(0) > 0 {
                column.primary_key = true;
            }
            if row.integer("notnull").unwrap_or(0) != 0 {
                column.nullable = false;
            }
            if let Some(raw) = row.get("dflt_value") {
                if let Some(text) = raw.as_text() {
                    column.default = Some(Self::parse_default(text));
                } else if let Some(i) = raw.as_integer() {
                    column.default = Some(DefaultValue::Integer(i));
                }
            }

            schema.columns.push(column);
        }
        schema.indexes = self.table_indexes(name).await?;

        Ok(Some(schema))
    }
}
