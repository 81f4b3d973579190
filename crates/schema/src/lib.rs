//! # veranda-schema: Database Schema Layer for veranda
//!
//! Declarative table schemas and the additive migration engine behind the
//! veranda admin framework. Panels declare the tables their resources need;
//! this crate compares those declarations against the live database and
//! applies whatever `CREATE TABLE` / `ADD COLUMN` statements are missing.
//!
//! The design is deliberately stateless: there is no migration-history
//! table. Every run re-derives the gap between declared and live schema by
//! catalog introspection, so repeated runs are idempotent and safe.

pub mod backends;
pub mod error;
pub mod migrations;
pub mod schema;

// Re-export core traits and types
pub use backends::*;
pub use error::*;
pub use migrations::*;
pub use schema::*;
