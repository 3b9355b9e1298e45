//! Configuration types for the Askdb service.
//!
//! Configuration is loaded once at startup from a single YAML file
//! (askdb.yaml) and combined into an [`AskdbConfig`] structure that is
//! read-only thereafter. Secrets (the LLM API key, optionally the full
//! database URL) are resolved from environment variables named in the file.

pub mod database;
pub mod llm;
pub mod server;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::policy::PolicyConfig;

pub use database::DatabaseConfig;
pub use llm::LlmConfig;
pub use server::ServerConfig;

/// Complete Askdb configuration loaded from a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskdbConfig {
    /// Project name.
    #[serde(default)]
    pub project: Option<String>,

    /// Upstream MySQL connection.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Table allowlist and column blacklist.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// LLM provider settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Schema description settings.
    #[serde(default)]
    pub schema: SchemaConfig,
}

impl Default for AskdbConfig {
    fn default() -> Self {
        Self {
            project: None,
            database: DatabaseConfig::default(),
            policy: PolicyConfig::default(),
            llm: LlmConfig::default(),
            server: ServerConfig::default(),
            schema: SchemaConfig::default(),
        }
    }
}

/// Schema description settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Path to the static schema description used when live introspection
    /// fails or yields no allowed entities.
    #[serde(default = "default_fallback_path")]
    pub fallback_path: PathBuf,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            fallback_path: default_fallback_path(),
        }
    }
}

fn default_fallback_path() -> PathBuf {
    PathBuf::from("./db_context.txt")
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AskdbConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let yaml = r#"
project: events-chatbot
database:
  host: db.internal
  port: 3306
  database: events
  username: reader
  password: secret
policy:
  allowed_tables: [events_view, Organizations_View, results_view]
  blacklisted_columns: [password, api_token]
llm:
  model: gemini-1.5-flash
  api_key_env: GEMINI_API_KEY
server:
  bind: 127.0.0.1:9000
  allowed_origins: ["http://localhost:8000"]
schema:
  fallback_path: ./db_context.txt
"#;
        let config = AskdbConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.project.as_deref(), Some("events-chatbot"));
        assert_eq!(config.database.database, "events");
        assert_eq!(config.policy.allowed_tables.len(), 3);
        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.schema.fallback_path, PathBuf::from("./db_context.txt"));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = AskdbConfig::from_yaml("project: minimal\n").unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert!(config.policy.allowed_tables.is_empty());
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
    }
}
