use askdb_adapter_mysql::{Database, SchemaDescriber};
use askdb_core::{AccessPolicy, AskdbConfig};
use askdb_llm::GeminiClient;
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod format;
mod prompt;
mod routes;
mod service;
mod state;

use service::ChatService;
use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "askdb-server", about = "Natural-language questions over a gated MySQL database")]
struct Args {
    /// Path to the configuration file.
    #[arg(long, default_value = "askdb.yaml", env = "ASKDB_CONFIG")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let args = Args::parse();
    let config = AskdbConfig::from_file(&args.config)?;
    let policy = AccessPolicy::from(&config.policy);

    if policy.allowed_table_count() == 0 {
        tracing::warn!("allowlist is empty; every generated query will be refused");
    }

    let Some(api_key) = config.llm.api_key() else {
        anyhow::bail!("LLM API key not set (environment variable {})", config.llm.api_key_env);
    };
    let llm = GeminiClient::new()
        .with_api_key(api_key)
        .with_model(&config.llm.model);

    // A failed pool connection degrades the service instead of aborting:
    // schema requests fall back to the static description and execution
    // is refused until a restart.
    let db = match Database::connect(&config.database.connection_string()).await {
        Ok(db) => {
            tracing::info!("database connection established");
            Some(db)
        }
        Err(error) => {
            tracing::warn!(%error, "database connection failed, continuing without it");
            None
        }
    };

    let describer = SchemaDescriber::new(&config.schema.fallback_path);
    let service = ChatService::new(policy, describer, llm, db);
    let state = AppState {
        service: Arc::new(service),
    };

    let origins: Vec<HeaderValue> = config
        .server
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let app = Router::new()
        .route("/chat", post(routes::chat))
        .route("/healthz", get(routes::healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = &config.server.bind;
    tracing::info!("askdb-server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
