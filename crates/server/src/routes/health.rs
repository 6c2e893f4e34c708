//! Health check endpoint

use axum::{Extension, Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::ai::ClaudeClient;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    /// Whether the LLM credential is configured; extraction and ranking
    /// are unavailable without it
    llm_configured: bool,
}

/// GET /health - Report liveness and optional-integration status
pub async fn check(Extension(client): Extension<Option<ClaudeClient>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            llm_configured: client.is_some(),
        }),
    )
}
