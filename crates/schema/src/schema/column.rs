//! Column definitions and the portable column type vocabulary

use serde::{Deserialize, Serialize};

/// Portable column types understood by every dialect.
///
/// This is a closed vocabulary rather than a pass-through of native type
/// strings so that schema diffing stays dialect-independent. Each variant
/// maps to exactly one native keyword per dialect (see the dialect's
/// `MigrationBuilder`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Text,
    Real,
    Blob,
    /// Stored as 0/1 in dialects without a native boolean
    Boolean,
    /// Stored as an ISO-8601 string in dialects without a native temporal type
    DateTime,
}

/// A column default, rendered as a dialect literal in generated DDL.
///
/// Absence of a default (`ColumnDefinition::default` is `None`) means no
/// `DEFAULT` clause at all, which is not the same thing as defaulting to
/// SQL `NULL`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        DefaultValue::Boolean(value)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        DefaultValue::Integer(value)
    }
}

impl From<i32> for DefaultValue {
    fn from(value: i32) -> Self {
        DefaultValue::Integer(value as i64)
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        DefaultValue::Real(value)
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        DefaultValue::Text(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        DefaultValue::Text(value)
    }
}

/// Declarative description of a single column.
///
/// The name is emitted verbatim in generated SQL — identifier hygiene is the
/// caller's responsibility, as is keeping names unique within a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name, unique within its table
    pub name: String,
    /// Portable column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Render an inline `PRIMARY KEY` constraint
    #[serde(default)]
    pub primary_key: bool,
    /// Auto-increment; meaningful only for an integer primary key
    #[serde(default)]
    pub auto_increment: bool,
    /// When false the column is generated `NOT NULL`
    #[serde(default = "default_true")]
    pub nullable: bool,
    /// Render a column-level `UNIQUE` constraint
    #[serde(default)]
    pub unique: bool,
    /// Optional default, rendered as a dialect literal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
}

fn default_true() -> bool {
    true
}

impl ColumnDefinition {
    /// Create a column of the given type; nullable, no constraints
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            primary_key: false,
            auto_increment: false,
            nullable: true,
            unique: false,
            default: None,
        }
    }

    /// Mark as primary key
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Mark as auto-incrementing (integer primary keys only)
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Generate `NOT NULL`
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Generate a `UNIQUE` constraint
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Set the default value
    pub fn default_value(mut self, value: impl Into<DefaultValue>) -> Self {
        self.default = Some(value.into());
        self
    }
}
