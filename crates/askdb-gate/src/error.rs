//! Rejection reasons emitted by the gate.

use crate::analyzer::StatementKind;
use thiserror::Error;

/// Why a candidate statement was refused.
///
/// One variant per rejection path. These are diagnostics for logs; the end
/// user only ever sees a generic refusal, deliberately indistinguishable
/// between malformed input and policy violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Nothing left after normalization.
    #[error("query is empty")]
    EmptyQuery,

    /// A forbidden keyword or pattern appeared in the statement text.
    #[error("query contains forbidden pattern {pattern:?}")]
    ForbiddenPattern { pattern: &'static str },

    /// A semicolon appeared anywhere other than the statement boundary.
    #[error("query contains an interior semicolon")]
    InteriorSemicolon,

    /// The statement could not be parsed.
    #[error("failed to parse SQL: {0}")]
    ParseError(String),

    /// Parsing produced a statement count other than one.
    #[error("expected exactly one statement, found {count}")]
    StatementCount { count: usize },

    /// The sole statement is not a SELECT.
    #[error("statement is not a SELECT (got {kind:?})")]
    NotSelect { kind: StatementKind },

    /// A FROM/JOIN target could not be resolved to a table name.
    #[error("a FROM/JOIN target could not be resolved to a table name")]
    UnresolvedFromTarget,

    /// A referenced table/view is outside the allowlist.
    #[error("access to table {table} is not allowed")]
    TableNotAllowed { table: String },
}
