//! LLM-backed endpoints (extraction, reranking, and the chained search)

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};
use trials_core::{QueryTerms, Trial, TrialSet};

use super::trials::TrialsResponse;
use crate::ai::{self, ClaudeClient};
use crate::error::AppError;
use crate::registry::RegistryClient;

/// Request body for metadata extraction
#[derive(Deserialize)]
pub struct ExtractRequest {
    prompt: Option<String>,
}

/// Request body for re-ranking already-fetched trials
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RerankRequest {
    trials: Option<TrialSet>,
    extracted_metadata: Option<QueryTerms>,
}

/// Request body for the chained search
#[derive(Deserialize)]
pub struct SearchRequest {
    prompt: Option<String>,
    #[serde(default = "default_rerank")]
    rerank: bool,
}

fn default_rerank() -> bool {
    true
}

/// Response body for the chained search
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query_terms: QueryTerms,
    pub trials: Vec<Trial>,
    pub ranked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking_error: Option<String>,
}

/// POST /api/extract — Extract structured medical concepts from text
pub async fn extract(
    Extension(client): Extension<Option<ClaudeClient>>,
    Json(body): Json<ExtractRequest>,
) -> Result<impl IntoResponse, AppError> {
    let prompt = require_prompt(body.prompt.as_deref())?;
    let client = client.ok_or(AppError::MissingApiKey)?;

    let terms = ai::extract::extract_query_terms(&client, prompt).await?;
    Ok(Json(terms))
}

/// POST /api/rerank — Annotate fetched trials with relevance metadata
///
/// Ranked ids with no matching trial are ignored; trials the model skipped
/// stay unscored.
pub async fn rerank(
    Extension(client): Extension<Option<ClaudeClient>>,
    Json(body): Json<RerankRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(mut trials), Some(extracted)) = (body.trials, body.extracted_metadata) else {
        return Err(AppError::Validation(
            "Trials and metadata are both required for re-ranking".to_string(),
        ));
    };
    let client = client.ok_or(AppError::MissingApiKey)?;

    let ranking = ai::rank::rank_trials(&client, &trials, &extracted).await?;
    let merged = trials.apply_ranking(ranking);
    tracing::info!(merged, total = trials.len(), "Applied relevance ranking");

    Ok(Json(TrialsResponse {
        trials: trials.to_vec(),
    }))
}

/// POST /api/search — The full chain: extract, fetch, optionally rerank.
///
/// Extraction failure aborts before the registry is queried. A ranking
/// failure degrades to the unranked result set instead of discarding it.
pub async fn search(
    State(registry): State<RegistryClient>,
    Extension(client): Extension<Option<ClaudeClient>>,
    Json(body): Json<SearchRequest>,
) -> Result<impl IntoResponse, AppError> {
    let prompt = require_prompt(body.prompt.as_deref())?;
    let client = client.ok_or(AppError::MissingApiKey)?;

    let query_terms = ai::extract::extract_query_terms(&client, prompt).await?;
    let mut trials = registry.search(Some(&query_terms)).await?;

    let mut ranked = false;
    let mut ranking_error = None;
    if body.rerank && !trials.is_empty() {
        match ai::rank::rank_trials(&client, &trials, &query_terms).await {
            Ok(ranking) => {
                let merged = trials.apply_ranking(ranking);
                tracing::info!(merged, total = trials.len(), "Applied relevance ranking");
                ranked = true;
            }
            Err(err) => {
                tracing::warn!(error = ?err, "Ranking failed, returning unranked trials");
                ranking_error = Some("Relevance ranking failed; results are unranked.".to_string());
            }
        }
    }

    Ok(Json(SearchResponse {
        query_terms,
        trials: trials.to_vec(),
        ranked,
        ranking_error,
    }))
}

/// Reject a missing or blank prompt before any network call is made
fn require_prompt(prompt: Option<&str>) -> Result<&str, AppError> {
    match prompt.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed),
        _ => Err(AppError::Validation("User prompt is required".to_string())),
    }
}
