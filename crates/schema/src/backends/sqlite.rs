//! SQLite connector backed by a sqlx pool

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{
    Sqlite, SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::query::Query;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use super::core::{DatabaseConnector, SqlRow, SqlValue};
use crate::error::{SchemaError, SchemaResult};

/// `DatabaseConnector` implementation over a sqlx SQLite pool
pub struct SqliteConnector {
    pool: SqlitePool,
}

impl SqliteConnector {
    /// Connect to a SQLite database URL (e.g. `sqlite://veranda.db`),
    /// creating the database file if it does not exist
    pub async fn connect(url: &str) -> SchemaResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchemaError::Connection(format!("Invalid SQLite URL '{}': {}", url, e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| SchemaError::Connection(format!("Failed to connect to '{}': {}", url, e)))?;

        Ok(Self { pool })
    }

    /// Connect to a fresh in-memory database.
    ///
    /// Pinned to a single pooled connection: every SQLite in-memory
    /// connection is its own database, so the pool must never rotate it.
    pub async fn in_memory() -> SchemaResult<Self> {
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| SchemaError::Connection(format!("Failed to open in-memory database: {}", e)))?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &'q SqlValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Integer(i) => query.bind(*i),
        SqlValue::Real(f) => query.bind(*f),
        SqlValue::Text(s) => query.bind(s.as_str()),
        SqlValue::Blob(b) => query.bind(b.as_slice()),
    }
}

fn decode_row(row: &SqliteRow) -> SchemaResult<SqlRow> {
    let mut values = HashMap::with_capacity(row.len());

    for column in row.columns() {
        let ordinal = column.ordinal();
        let raw = row.try_get_raw(ordinal)?;
        let value = if raw.is_null() {
            SqlValue::Null
        } else {
            match raw.type_info().name() {
                "INTEGER" => SqlValue::Integer(row.try_get(ordinal)?),
                "BOOLEAN" => SqlValue::Integer(row.try_get::<bool, _>(ordinal)? as i64),
                "REAL" | "NUMERIC" => SqlValue::Real(row.try_get(ordinal)?),
                "BLOB" => SqlValue::Blob(row.try_get(ordinal)?),
                _ => SqlValue::Text(row.try_get(ordinal)?),
            }
        };
        values.insert(column.name().to_string(), value);
    }

    Ok(SqlRow::new(values))
}

#[async_trait]
impl DatabaseConnector for SqliteConnector {
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> SchemaResult<u64> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_value(query, param);
        }

        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn query(&self, sql: &str, params: &[SqlValue]) -> SchemaResult<Vec<SqlRow>> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_value(query, param);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(decode_row).collect()
    }

    fn is_connected(&self) -> bool {
        !self.pool.is_closed()
    }

    async fn close(&self) -> SchemaResult<()> {
        self.pool.close().await;
        Ok(())
    }
}
