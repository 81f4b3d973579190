//! Additive schema migrations
//!
//! Declared `TableSchema` values are compared against the live catalog and
//! reconciled with `CREATE TABLE` / `ADD COLUMN` statements. There is no
//! migration-history table: each pass re-derives what is missing, which
//! keeps re-runs idempotent at the cost of tracked rollbacks (destructive
//! changes are out of scope anyway).

pub mod builder;
pub mod inspector;
pub mod runner;

pub use builder::{MigrationBuilder, SqliteMigrationBuilder};
pub use inspector::{SchemaInspector, SqliteSchemaInspector};
pub use runner::MigrationRunner;
