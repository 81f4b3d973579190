//! Declarative schema model
//!
//! Plain value types describing the desired shape of a table. Instances are
//! built by the caller (typically generated from a panel's resource
//! definitions) and handed to the migration runner each pass; nothing here
//! touches the database.

mod column;
mod table;

pub use column::{ColumnDefinition, ColumnType, DefaultValue};
pub use table::{IndexDefinition, TableSchema};
