//! # askdb-gate
//!
//! The gate that stands between model-generated SQL and a real database
//! connection.
//!
//! This crate provides functionality to:
//! - Strip incidental formatting from model output (`normalize`)
//! - Parse SQL into a structural representation using `sqlparser`
//! - Extract the set of tables and views a statement references
//! - Decide deterministically whether a statement is safe to execute
//!
//! ## How It Works
//!
//! A statement is accepted only if every check passes:
//!
//! | Check | Rejects |
//! |-------|---------|
//! | Lexical scan | DDL/DML keywords, comments, `UNION`, file-output clauses |
//! | Semicolon guard | Any interior semicolon (multi-statement tricks) |
//! | Structural parse | Unparseable input, statement count != 1 |
//! | Statement kind | Anything that is not a SELECT |
//! | Reference extraction | FROM/JOIN targets that cannot be resolved |
//! | Allowlist | Any referenced table/view outside the configured set |
//!
//! Rejection reasons are logged internally and never surface to the end
//! user, so a refusal does not reveal which tables exist.

pub mod analyzer;
pub mod enforcer;
pub mod error;
pub mod normalize;

pub use analyzer::{FromTarget, SqlAnalyzer, StatementKind};
pub use enforcer::QueryGate;
pub use error::Rejection;
pub use normalize::normalize;
