//! Database Connector Abstraction
//!
//! The migration engine talks to the database through the narrow
//! `DatabaseConnector` trait defined here, so a second engine can be wired
//! in without touching the inspector or runner. One implementation ships:
//! SQLite over sqlx.

mod core;
mod sqlite;

pub use self::core::{DatabaseConnector, SqlRow, SqlValue};
pub use self::sqlite::SqliteConnector;
