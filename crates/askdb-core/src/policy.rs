//! Access policy for model-generated SQL.
//!
//! The policy is an explicitly constructed, immutable value loaded once at
//! startup and passed by reference into the gate and the schema
//! introspector. Names are compared case-insensitively; both sets are
//! lower-cased on construction so lookups are plain set membership.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Config-file form of the access policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Tables and views a generated query may reference.
    #[serde(default)]
    pub allowed_tables: Vec<String>,

    /// Columns never exposed in schema descriptions.
    #[serde(default)]
    pub blacklisted_columns: Vec<String>,
}

/// Immutable allowlist/blacklist policy.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    allowed_tables: HashSet<String>,
    blacklisted_columns: HashSet<String>,
}

impl AccessPolicy {
    /// Build a policy from table and column name lists. Names are
    /// lower-cased; duplicates collapse.
    pub fn new<T, C>(allowed_tables: T, blacklisted_columns: C) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        Self {
            allowed_tables: allowed_tables
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .collect(),
            blacklisted_columns: blacklisted_columns
                .into_iter()
                .map(|c| c.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Check whether a table or view may be referenced. The name is
    /// lower-cased before lookup.
    pub fn allows_table(&self, name: &str) -> bool {
        self.allowed_tables.contains(&name.to_lowercase())
    }

    /// Check whether a column must be hidden from schema descriptions.
    pub fn hides_column(&self, name: &str) -> bool {
        self.blacklisted_columns.contains(&name.to_lowercase())
    }

    /// Number of allowlisted tables/views.
    pub fn allowed_table_count(&self) -> usize {
        self.allowed_tables.len()
    }
}

impl From<&PolicyConfig> for AccessPolicy {
    fn from(config: &PolicyConfig) -> Self {
        Self::new(&config.allowed_tables, &config.blacklisted_columns)
    }
}
