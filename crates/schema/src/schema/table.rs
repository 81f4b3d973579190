//! Table schemas and index definitions

use serde::{Deserialize, Serialize};

use super::column::ColumnDefinition;

/// A named index over an ordered list of columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}

impl IndexDefinition {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// The desired shape of one table.
///
/// Column order here is the column order in `CREATE TABLE`. Column names
/// must be unique within the table; this is a caller contract and is not
/// validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<IndexDefinition>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Append a column (fluent)
    pub fn with_column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    /// Append an index (fluent)
    pub fn with_index(mut self, index: IndexDefinition) -> Self {
        self.indexes.push(index);
        self
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Declared column names, in declaration order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    fn users_schema() -> TableSchema {
        TableSchema::new("users")
            .with_column(
                ColumnDefinition::new("id", ColumnType::Integer)
                    .primary_key()
                    .auto_increment(),
            )
            .with_column(ColumnDefinition::new("email", ColumnType::Text).not_null().unique())
            .with_index(IndexDefinition::new("idx_users_email", vec!["email".to_string()]))
    }

    #[test]
    fn test_column_lookup() {
        let schema = users_schema();

        assert!(schema.column("email").is_some());
        assert!(schema.column("missing").is_none());
        assert_eq!(schema.column_names(), vec!["id", "email"]);
    }

    #[test]
    fn test_manifest_round_trip() {
        let schema = users_schema();
        let json = serde_json::to_string(&schema).unwrap();
        let parsed: TableSchema = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, schema);
    }
}
