//! # askdb-adapter-mysql
//!
//! Database access layer for Askdb: owns the MySQL connection pool,
//! introspects `information_schema` into the restricted schema description
//! shown to the model, and executes gate-approved SELECT statements.
//!
//! The schema description is regenerated on every request so schema drift
//! is reflected immediately in what the model is told it may query.

pub mod db;
pub mod describe;
pub mod error;
pub mod introspect;

pub use db::Database;
pub use describe::{SCHEMA_UNAVAILABLE, SchemaDescriber, SchemaSource};
pub use error::{DbError, SchemaError};
pub use introspect::introspect_schema;
