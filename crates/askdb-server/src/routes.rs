//! HTTP route handlers.

use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use uuid::Uuid;

/// Body of a `/chat` request.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of a `/chat` response.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response_text: String,
    pub query_results_data: Vec<Map<String, Value>>,
}

/// Answer a natural-language question about the database.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> (StatusCode, Json<ChatResponse>) {
    let Some(message) = request.message.filter(|m| !m.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ChatResponse {
                response_text: "No message provided".to_string(),
                query_results_data: Vec::new(),
            }),
        );
    };

    let request_id = Uuid::new_v4();
    tracing::info!(%request_id, message, "received chat message");

    let outcome = state.service.process(&message).await;

    tracing::info!(
        %request_id,
        rows = outcome.query_results.len(),
        "chat request completed"
    );

    (
        StatusCode::OK,
        Json(ChatResponse {
            response_text: outcome.response_text,
            query_results_data: outcome.query_results,
        }),
    )
}

/// Liveness probe.
pub async fn healthz() -> Json<Value> {
    Json(json!({ "ok": true, "service": "askdb-server" }))
}
