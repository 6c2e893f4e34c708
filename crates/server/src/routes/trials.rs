//! Registry-backed trial endpoints

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::Value as JsonValue;
use trials_core::{QueryTerms, Trial};

use crate::error::AppError;
use crate::registry::RegistryClient;

/// Response body carrying trials in registry order
#[derive(Serialize)]
pub struct TrialsResponse {
    pub trials: Vec<Trial>,
}

/// POST /api/trials/search - Query the registry with structured terms
pub async fn search(
    State(registry): State<RegistryClient>,
    Json(query_terms): Json<QueryTerms>,
) -> Result<impl IntoResponse, AppError> {
    let set = registry.search(Some(&query_terms)).await?;

    Ok(Json(TrialsResponse {
        trials: set.to_vec(),
    }))
}

/// GET /api/trials/{id} - Fetch one study record verbatim for detail display
pub async fn detail(
    State(registry): State<RegistryClient>,
    Path(id): Path<String>,
) -> Result<Json<JsonValue>, AppError> {
    let study = registry.study(&id).await?;
    Ok(Json(study))
}
