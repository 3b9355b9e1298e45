//! The policy gate that accepts or rejects candidate SQL.

use crate::analyzer::{FromTarget, SqlAnalyzer, StatementKind};
use crate::error::Rejection;
use askdb_core::AccessPolicy;
use std::collections::HashSet;

/// Patterns that reject a statement outright. Matched case-insensitively
/// against the trimmed statement text; keywords are space-bounded so they
/// do not trigger on substrings inside identifiers.
const FORBIDDEN_PATTERNS: [&str; 17] = [
    " insert ",
    " update ",
    " delete ",
    " alter ",
    " create ",
    " drop ",
    " truncate ",
    " replace ",
    " grant ",
    " revoke ",
    "--",
    "/*",
    "*/",
    " union",
    " into ",
    " outfile ",
    " dumpfile ",
];

/// Decides whether model-generated SQL may be executed.
///
/// Constructed once with an [`AccessPolicy`] and shared by reference;
/// every call is independent and side-effect-free.
#[derive(Clone)]
pub struct QueryGate {
    analyzer: SqlAnalyzer,
    policy: AccessPolicy,
}

impl QueryGate {
    /// Create a gate enforcing the given policy.
    pub fn new(policy: AccessPolicy) -> Self {
        Self {
            analyzer: SqlAnalyzer::new(),
            policy,
        }
    }

    /// Apply every check in order and return the first failure.
    ///
    /// Checks: non-empty, no forbidden patterns, no interior semicolon,
    /// parses to exactly one statement, statement is a SELECT, every
    /// FROM/JOIN target resolves, every referenced name is allowlisted.
    /// A reference set left empty by a SELECT with no FROM clause passes
    /// the allowlist loop vacuously.
    pub fn check(&self, sql: &str) -> Result<(), Rejection> {
        let trimmed = sql.trim();
        if trimmed.is_empty() {
            return Err(Rejection::EmptyQuery);
        }

        let lowered = trimmed.to_lowercase();
        for pattern in FORBIDDEN_PATTERNS {
            if lowered.contains(pattern) {
                return Err(Rejection::ForbiddenPattern { pattern });
            }
        }

        // Surrounding semicolons are tolerated; an interior one is fatal.
        if trimmed.trim_matches([' ', ';']).contains(';') {
            return Err(Rejection::InteriorSemicolon);
        }

        let statements = self.analyzer.parse(trimmed)?;
        if statements.len() != 1 {
            return Err(Rejection::StatementCount {
                count: statements.len(),
            });
        }

        let statement = &statements[0];
        let kind = self.analyzer.statement_kind(statement);
        if kind != StatementKind::Select {
            return Err(Rejection::NotSelect { kind });
        }

        let mut referenced: HashSet<String> = HashSet::new();
        for target in self.analyzer.from_targets(statement) {
            match target {
                FromTarget::Named(name) => {
                    referenced.insert(name);
                }
                FromTarget::Opaque => {}
                FromTarget::Unresolved => return Err(Rejection::UnresolvedFromTarget),
            }
        }

        for table in referenced {
            if !self.policy.allows_table(&table) {
                return Err(Rejection::TableNotAllowed { table });
            }
        }

        Ok(())
    }

    /// Boolean form of [`check`](Self::check), logging the rejection
    /// reason. The reason stays in the logs; callers reply to the end
    /// user with a generic refusal.
    pub fn validate(&self, sql: &str) -> bool {
        match self.check(sql) {
            Ok(()) => {
                tracing::debug!(sql, "query passed validation");
                true
            }
            Err(rejection) => {
                tracing::warn!(sql, reason = %rejection, "blocked query");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use pretty_assertions::assert_eq;

    fn gate() -> QueryGate {
        QueryGate::new(AccessPolicy::new(
            ["events_view", "organizations_view", "results_view"],
            ["password"],
        ))
    }

    #[test]
    fn accepts_allowlisted_select() {
        assert!(gate().validate(
            "SELECT event_id, name FROM events_view WHERE quantity_now < max_quantity"
        ));
    }

    #[test]
    fn accepts_join_over_allowlisted_views() {
        assert!(gate().validate(
            "SELECT e.name FROM events_view AS e \
             JOIN organizations_view AS o ON e.organization_id = o.organization_id"
        ));
    }

    #[test]
    fn accepts_single_trailing_semicolon() {
        assert!(gate().validate("SELECT name FROM events_view;"));
    }

    #[test]
    fn rejects_empty_query() {
        assert_eq!(gate().check(""), Err(Rejection::EmptyQuery));
        assert_eq!(gate().check("   "), Err(Rejection::EmptyQuery));
    }

    #[test]
    fn rejects_non_select_statement() {
        let result = gate().check("DELETE FROM events_view");
        assert_eq!(
            result,
            Err(Rejection::NotSelect {
                kind: StatementKind::Delete
            })
        );
    }

    #[test]
    fn rejects_table_outside_allowlist() {
        let result = gate().check("SELECT * FROM users");
        assert_eq!(
            result,
            Err(Rejection::TableNotAllowed {
                table: "users".to_string()
            })
        );
    }

    #[test]
    fn rejects_forbidden_keyword_even_with_valid_shape() {
        let result = gate().check("SELECT * FROM events_view; DROP TABLE events_view");
        assert_eq!(
            result,
            Err(Rejection::ForbiddenPattern { pattern: " drop " })
        );
    }

    #[test]
    fn rejects_interior_semicolon() {
        let result = gate().check("SELECT 1; SELECT 2");
        assert_eq!(result, Err(Rejection::InteriorSemicolon));
    }

    #[test]
    fn rejects_comment_markers() {
        assert!(!gate().validate("SELECT name FROM events_view -- hidden"));
        assert!(!gate().validate("SELECT /* x */ name FROM events_view"));
    }

    #[test]
    fn rejects_union() {
        assert!(!gate().validate("SELECT name FROM events_view UNION SELECT login FROM users"));
    }

    #[test]
    fn rejects_unparseable_input() {
        assert!(matches!(
            gate().check("SELECT FROM WHERE"),
            Err(Rejection::ParseError(_))
        ));
    }

    #[test]
    fn keyword_inside_identifier_does_not_trigger() {
        // "created_at" contains "create"; the bounded match must not fire.
        assert!(gate().validate("SELECT created_at FROM events_view"));
    }

    #[test]
    fn select_without_from_is_accepted() {
        assert!(gate().validate("SELECT 1"));
    }

    #[test]
    fn alias_does_not_hide_disallowed_table() {
        assert!(!gate().validate("SELECT u.name FROM users AS u"));
    }

    #[test]
    fn validation_is_stable_under_repeated_normalization() {
        let inputs = [
            "```sql\nSELECT name FROM events_view\n```",
            "SELECT name FROM events_view",
            "```sql\nDELETE FROM events_view\n```",
            "",
            "not sql at all",
        ];
        let gate = gate();
        for input in inputs {
            let once = normalize(input);
            let twice = normalize(&once);
            assert_eq!(gate.validate(&twice), gate.validate(&once), "{input:?}");
        }
    }
}
