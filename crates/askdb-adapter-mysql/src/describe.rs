//! Schema description with static fallback.

use crate::db::Database;
use crate::introspect::introspect_schema;
use askdb_core::AccessPolicy;
use std::fs;
use std::path::PathBuf;

/// Marker returned when neither live introspection nor the static
/// description is available. Callers building a model prompt must treat
/// this as a reason to abort the request.
pub const SCHEMA_UNAVAILABLE: &str = "Database schema description is unavailable.";

/// Where a schema description came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaSource {
    /// Derived from live metadata.
    Live,
    /// Read from the pre-authored static file.
    Fallback,
    /// Neither worked; the text is the [`SCHEMA_UNAVAILABLE`] marker.
    Unavailable,
}

/// Produces the schema description for prompt building.
///
/// The description is regenerated on every call; nothing is cached, so
/// schema drift shows up immediately.
pub struct SchemaDescriber {
    fallback_path: PathBuf,
}

impl SchemaDescriber {
    /// Create a describer with the given static-description path.
    pub fn new(fallback_path: impl Into<PathBuf>) -> Self {
        Self {
            fallback_path: fallback_path.into(),
        }
    }

    /// Describe the allowed schema. Never errors: a live description when
    /// introspection succeeds, otherwise the static file, otherwise the
    /// [`SCHEMA_UNAVAILABLE`] marker.
    pub async fn describe(
        &self,
        db: Option<&Database>,
        policy: &AccessPolicy,
    ) -> (String, SchemaSource) {
        match db {
            Some(db) => match introspect_schema(db.pool(), policy).await {
                Ok(text) => return (text, SchemaSource::Live),
                Err(error) => {
                    tracing::warn!(
                        %error,
                        "live schema introspection failed, trying static description"
                    );
                }
            },
            None => {
                tracing::warn!("no database connection, trying static description");
            }
        }

        self.read_fallback()
    }

    fn read_fallback(&self) -> (String, SchemaSource) {
        match fs::read_to_string(&self.fallback_path) {
            Ok(text) if !text.trim().is_empty() => (text, SchemaSource::Fallback),
            Ok(_) => {
                tracing::warn!(path = %self.fallback_path.display(), "static schema description is empty");
                (SCHEMA_UNAVAILABLE.to_string(), SchemaSource::Unavailable)
            }
            Err(error) => {
                tracing::warn!(
                    path = %self.fallback_path.display(),
                    %error,
                    "static schema description could not be read"
                );
                (SCHEMA_UNAVAILABLE.to_string(), SchemaSource::Unavailable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use askdb_core::AccessPolicy;
    use std::io::Write;

    fn policy() -> AccessPolicy {
        AccessPolicy::new(["events_view"], Vec::<String>::new())
    }

    #[tokio::test]
    async fn falls_back_to_file_without_connection() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Static schema: events_view(event_id, name)").unwrap();

        let describer = SchemaDescriber::new(file.path());
        let (text, source) = describer.describe(None, &policy()).await;

        assert_eq!(source, SchemaSource::Fallback);
        assert!(text.contains("events_view"));
    }

    #[tokio::test]
    async fn missing_file_yields_unavailable_marker() {
        let describer = SchemaDescriber::new("/nonexistent/db_context.txt");
        let (text, source) = describer.describe(None, &policy()).await;

        assert_eq!(source, SchemaSource::Unavailable);
        assert_eq!(text, SCHEMA_UNAVAILABLE);
    }

    #[tokio::test]
    async fn empty_file_yields_unavailable_marker() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let describer = SchemaDescriber::new(file.path());
        let (text, source) = describer.describe(None, &policy()).await;

        assert_eq!(source, SchemaSource::Unavailable);
        assert_eq!(text, SCHEMA_UNAVAILABLE);
    }
}
