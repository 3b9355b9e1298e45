//! The chat pipeline: schema -> prompt -> LLM -> gate -> execute -> narrate.

use crate::format::format_results;
use crate::prompt;
use askdb_adapter_mysql::{Database, SchemaDescriber, SchemaSource};
use askdb_core::AccessPolicy;
use askdb_gate::{QueryGate, normalize};
use askdb_llm::GeminiClient;
use serde_json::{Map, Value};

// User-facing replies. Rejections are deliberately generic: the detailed
// reason stays in the logs so a refusal never reveals which tables exist.
const REPLY_SCHEMA_UNAVAILABLE: &str =
    "Sorry, the database schema is currently unavailable. Please try again later.";
const REPLY_GENERATION_FAILED: &str = "Sorry, I ran into a problem generating a query.";
const REPLY_QUERY_REJECTED: &str =
    "Sorry, the generated query was invalid or not permitted for security reasons.";
const REPLY_DB_UNAVAILABLE: &str =
    "Sorry, the database is currently unreachable. Please try again later.";
const REPLY_EXECUTION_FAILED: &str = "Sorry, I could not retrieve the requested data.";

/// Outcome of one chat request.
pub struct ChatOutcome {
    pub response_text: String,
    pub query_results: Vec<Map<String, Value>>,
}

impl ChatOutcome {
    fn message(text: &str) -> Self {
        Self {
            response_text: text.to_string(),
            query_results: Vec::new(),
        }
    }
}

/// Orchestrates one chat request end to end.
pub struct ChatService {
    policy: AccessPolicy,
    gate: QueryGate,
    describer: SchemaDescriber,
    llm: GeminiClient,
    db: Option<Database>,
}

impl ChatService {
    /// Assemble the service. `db` is `None` when the pool could not be
    /// connected at startup; the service then serves fallback schema
    /// descriptions but refuses execution.
    pub fn new(
        policy: AccessPolicy,
        describer: SchemaDescriber,
        llm: GeminiClient,
        db: Option<Database>,
    ) -> Self {
        Self {
            gate: QueryGate::new(policy.clone()),
            policy,
            describer,
            llm,
            db,
        }
    }

    /// Process one user question.
    pub async fn process(&self, user_message: &str) -> ChatOutcome {
        let (schema, source) = self.describer.describe(self.db.as_ref(), &self.policy).await;
        if source == SchemaSource::Unavailable {
            return ChatOutcome::message(REPLY_SCHEMA_UNAVAILABLE);
        }

        let generation_prompt = prompt::sql_generation(&schema, user_message);
        let raw_sql = match self.llm.generate(&generation_prompt).await {
            Ok(text) => text,
            Err(error) => {
                tracing::error!(%error, "SQL generation failed");
                return ChatOutcome::message(REPLY_GENERATION_FAILED);
            }
        };

        let sql = normalize(&raw_sql);
        if !self.gate.validate(&sql) {
            return ChatOutcome::message(REPLY_QUERY_REJECTED);
        }

        let Some(db) = self.db.as_ref() else {
            return ChatOutcome::message(REPLY_DB_UNAVAILABLE);
        };

        tracing::info!(sql, "executing validated query");
        let rows = match db.run_select(&sql).await {
            Ok(rows) => rows,
            Err(error) => {
                tracing::error!(%error, "query execution failed");
                return ChatOutcome::message(REPLY_EXECUTION_FAILED);
            }
        };

        let results_table = format_results(&rows);
        let narration_prompt = prompt::narration(user_message, &sql, &results_table);
        let response_text = match self.llm.generate(&narration_prompt).await {
            Ok(text) => text,
            Err(error) => {
                // The data is already in hand; degrade to the raw table
                // rather than dropping the answer.
                tracing::warn!(%error, "narration failed, returning formatted results");
                results_table
            }
        };

        ChatOutcome {
            response_text,
            query_results: rows,
        }
    }
}
