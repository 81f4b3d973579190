//! Migration Runner - reconciles declared schemas against the live database
//!
//! One pass per call: for each declared table, create it if absent,
//! otherwise add whatever declared columns the live table lacks. Strictly
//! additive; nothing is ever dropped, renamed, or retyped. Because every
//! generated statement only fills a gap that was just observed (and carries
//! an `IF NOT EXISTS` guard where the dialect allows), a re-run after a
//! partial failure simply resumes from the remaining gaps.
//!
//! Statements execute sequentially on the caller's task. Two runners
//! migrating the same database concurrently can race on `ADD COLUMN`
//! (both observe the column missing, one fails); run migrations from a
//! single instance at startup.

use std::sync::Arc;

use crate::backends::DatabaseConnector;
use crate::error::{SchemaError, SchemaResult};
use crate::migrations::builder::{MigrationBuilder, SqliteMigrationBuilder};
use crate::migrations::inspector::{SchemaInspector, SqliteSchemaInspector};
use crate::schema::{ColumnDefinition, TableSchema};

/// Executes additive schema migrations through a `DatabaseConnector`
pub struct MigrationRunner {
    connector: Arc<dyn DatabaseConnector>,
    inspector: Box<dyn SchemaInspector>,
    builder: Box<dyn MigrationBuilder>,
}

impl MigrationRunner {
    /// Create a runner from an explicit inspector/builder pair.
    ///
    /// This is the seam for additional dialects: implement
    /// `SchemaInspector` and `MigrationBuilder` for the engine and pass
    /// them here; the reconciliation logic is dialect-independent.
    pub fn new(
        connector: Arc<dyn DatabaseConnector>,
        inspector: Box<dyn SchemaInspector>,
        builder: Box<dyn MigrationBuilder>,
    ) -> Self {
        Self {
            connector,
            inspector,
            builder,
        }
    }

    /// Create a runner for a SQLite database
    pub fn sqlite(connector: Arc<dyn DatabaseConnector>) -> Self {
        let inspector = Box::new(SqliteSchemaInspector::new(connector.clone()));
        Self::new(connector, inspector, Box::new(SqliteMigrationBuilder::new()))
    }

    /// Get the inspector used by this runner
    pub fn inspector(&self) -> &dyn SchemaInspector {
        self.inspector.as_ref()
    }

    /// Whether the declared schema has any gap in the live database:
    /// the table is missing entirely, or any declared column is.
    ///
    /// Detection is strictly additive — type mismatches, nullability
    /// drift, and extra live columns are not considered.
    pub async fn needs_migration(&self, schema: &TableSchema) -> SchemaResult<bool> {
        if !self.inspector.table_exists(&schema.name).await {
            return Ok(true);
        }

        let live = self.inspector.table_columns(&schema.name).await?;
        Ok(schema
            .columns
            .iter()
            .any(|column| !live.contains(&column.name)))
    }

    /// Declared columns absent from the live table, in declared order.
    /// For a table that does not exist at all, every column is missing.
    pub async fn missing_columns(
        &self,
        schema: &TableSchema,
    ) -> SchemaResult<Vec<ColumnDefinition>> {
        if !self.inspector.table_exists(&schema.name).await {
            return Ok(schema.columns.clone());
        }

        let live = self.inspector.table_columns(&schema.name).await?;
        Ok(schema
            .columns
            .iter()
            .filter(|column| !live.contains(&column.name))
            .cloned()
            .collect())
    }

    /// Run one migration pass over the given schemas, in input order.
    ///
    /// Returns every SQL statement that was actually executed, in
    /// execution order; an empty list means no schema needed any change.
    /// The first failing statement aborts the pass — statements already
    /// applied (in this or earlier tables) stay applied.
    pub async fn run_migrations(&self, schemas: &[TableSchema]) -> SchemaResult<Vec<String>> {
        let mut executed = Vec::new();

        for schema in schemas {
            if !self.inspector.table_exists(&schema.name).await {
                tracing::debug!(table = %schema.name, "creating table");
                let sql = self.builder.build_create_table(schema);
                self.apply(&schema.name, sql, &mut executed).await?;

                for index in &schema.indexes {
                    let sql = self.builder.build_create_index(&schema.name, index);
                    self.apply(&schema.name, sql, &mut executed).await?;
                }
            } else {
                let missing = self.missing_columns(schema).await?;
                if missing.is_empty() {
                    continue;
                }

                tracing::debug!(table = %schema.name, count = missing.len(), "adding missing columns");
                for sql in self.builder.build_add_columns(&schema.name, &missing) {
                    self.apply(&schema.name, sql, &mut executed).await?;
                }
            }
        }

        Ok(executed)
    }

    async fn apply(
        &self,
        table: &str,
        sql: String,
        executed: &mut Vec<String>,
    ) -> SchemaResult<()> {
        tracing::debug!(table, sql = %sql, "executing");
        self.connector
            .execute(&sql, &[])
            .await
            .map_err(|e| SchemaError::Migration(format!("Failed to execute '{}': {}", sql, e)))?;
        executed.push(sql);
        Ok(())
    }
}
