//! Error types for the MySQL adapter.

use thiserror::Error;

/// Errors raised by schema introspection.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Metadata queries failed (connectivity, permissions, driver).
    #[error("failed to query database metadata: {0}")]
    Metadata(#[from] sqlx::Error),

    /// Introspection worked but nothing in the live schema is allowlisted.
    /// Distinct from an empty-but-valid description so callers can fall
    /// back instead of prompting the model with no schema at all.
    #[error("no allowed tables or views found in the live schema")]
    NoAllowedEntities,
}

/// Errors raised by pool construction and query execution.
#[derive(Debug, Error)]
pub enum DbError {
    /// Connecting the pool failed.
    #[error("failed to connect to database: {0}")]
    Connect(sqlx::Error),

    /// Executing a statement failed.
    #[error("query execution failed: {0}")]
    Execute(sqlx::Error),
}
