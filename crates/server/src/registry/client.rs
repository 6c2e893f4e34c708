//! ClinicalTrials.gov v2 API client

use serde_json::Value as JsonValue;
use trials_core::{QueryTerms, TrialSet, search_url};

use crate::error::AppError;

const SERVICE: &str = "ClinicalTrials.gov";

/// Client for the public trials registry
#[derive(Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl RegistryClient {
    pub fn new(base_url: String, page_size: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            page_size,
        }
    }

    /// Search the registry and normalize the response into a trial set.
    ///
    /// A non-2xx status is a hard failure naming the status code; a 2xx
    /// body without a `studies` array counts as an empty upstream reply.
    pub async fn search(&self, query_terms: Option<&QueryTerms>) -> Result<TrialSet, AppError> {
        let url = search_url(&self.base_url, self.page_size, query_terms);
        tracing::debug!(url = %url, "Querying trials registry");

        let body = self.get_json(&url).await?;
        let studies = body
            .get("studies")
            .and_then(JsonValue::as_array)
            .ok_or(AppError::UpstreamEmpty(SERVICE))?;

        let set = TrialSet::from_studies(studies);
        tracing::info!(returned = studies.len(), normalized = set.len(), "Registry search done");
        Ok(set)
    }

    /// Fetch one study record verbatim for detail display.
    ///
    /// The id is validated before any network call.
    pub async fn study(&self, nct_id: &str) -> Result<JsonValue, AppError> {
        let nct_id = nct_id.trim();
        if nct_id.is_empty() {
            return Err(AppError::Validation("Invalid ID provided.".to_string()));
        }

        let base = self.base_url.trim_end_matches('/');
        self.get_json(&format!("{base}/{nct_id}")).await
    }

    async fn get_json(&self, url: &str) -> Result<JsonValue, AppError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Registry request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            tracing::error!(status, url = %url, "Registry returned an error status");
            return Err(AppError::Upstream {
                service: SERVICE,
                status,
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to parse registry response: {e}")))
    }
}
