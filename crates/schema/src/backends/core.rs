//! Core connector trait and row/value types
//!
//! These types abstract away the concrete driver so the inspector and
//! runner can be exercised against any engine (or a fake in tests).

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::SchemaResult;

/// A database value in SQLite's storage-class shape
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            SqlValue::Real(f) => Some(*f),
            SqlValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            SqlValue::Blob(b) => Some(b),
            _ => None,
        }
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Integer(value as i64)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Blob(value)
    }
}

/// One result row, keyed by column name
#[derive(Debug, Clone, Default)]
pub struct SqlRow {
    values: HashMap<String, SqlValue>,
}

impl SqlRow {
    pub fn new(values: HashMap<String, SqlValue>) -> Self {
        Self { values }
    }

    /// Get a column value by name
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.values.get(column)
    }

    /// Get a text column by name
    pub fn text(&self, column: &str) -> Option<&str> {
        self.values.get(column).and_then(SqlValue::as_text)
    }

    /// Get an integer column by name
    pub fn integer(&self, column: &str) -> Option<i64> {
        self.values.get(column).and_then(SqlValue::as_integer)
    }

    pub fn column_count(&self) -> usize {
        self.values.len()
    }
}

/// Abstract database connector.
///
/// Lifecycle (connect/close) is owned by the caller; the migration engine
/// assumes the connector is already connected and never closes it.
#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    /// Execute a statement and return the affected row count
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> SchemaResult<u64>;

    /// Run a query and return all result rows
    async fn query(&self, sql: &str, params: &[SqlValue]) -> SchemaResult<Vec<SqlRow>>;

    /// Whether the underlying connection is still usable
    fn is_connected(&self) -> bool;

    /// Close the underlying connection
    async fn close(&self) -> SchemaResult<()>;
}
