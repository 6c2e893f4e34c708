//! Claude API client for the Anthropic Messages API

use serde::{Deserialize, Serialize};

use crate::error::AppError;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-0";

/// Client for the Anthropic Claude Messages API
#[derive(Clone)]
pub struct ClaudeClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// Text content block within a reply
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Request body for the Messages API
#[derive(Serialize)]
struct ApiRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

/// Response from the Messages API
#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

/// Error detail from the Messages API
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl ClaudeClient {
    /// Create a new client with the given API key
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Send one system-prompted user turn and return the reply text.
    ///
    /// A reply with no text block is an empty-response error, never an
    /// empty string.
    pub async fn message(
        &self,
        system: &str,
        user_message: &str,
        max_tokens: u32,
    ) -> Result<String, AppError> {
        let request = ApiRequest {
            model: self.model.clone(),
            max_tokens,
            system: system.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: user_message.to_string(),
            }],
        };

        let response = self
            .http
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Claude API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            match serde_json::from_str::<ApiError>(&body) {
                Ok(api_err) => {
                    tracing::error!(status, message = %api_err.error.message, "Claude API error")
                }
                Err(_) => tracing::error!(status, body = %body, "Claude API error"),
            }
            return Err(AppError::Upstream {
                service: "Claude API",
                status,
            });
        }

        let reply: ApiResponse = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to parse Claude response: {e}")))?;

        reply
            .content
            .iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text.clone()),
                ContentBlock::Other => None,
            })
            .ok_or(AppError::UpstreamEmpty("Claude API"))
    }
}
