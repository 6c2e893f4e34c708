//! Application error handling

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use trials_core::DecodeError;

/// Application error type.
///
/// Maps each failure class of the pipeline to a response status:
/// validation problems are the caller's fault (400), upstream trouble is a
/// bad gateway (502), and a missing credential or anything unexpected is an
/// internal error (500). None of these are retried.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    /// Non-2xx reply from an external API, named by service and status
    Upstream {
        service: &'static str,
        status: u16,
    },
    /// External API answered 2xx but with no usable payload
    UpstreamEmpty(&'static str),
    /// Model reply did not decode into the expected JSON shape
    Decode(DecodeError),
    /// ANTHROPIC_API_KEY is not configured
    MissingApiKey,
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream { service, status } => (
                StatusCode::BAD_GATEWAY,
                format!("{service} responded with status {status}"),
            ),
            AppError::UpstreamEmpty(service) => (
                StatusCode::BAD_GATEWAY,
                format!("Empty response from {service}"),
            ),
            AppError::Decode(err) => (
                StatusCode::BAD_GATEWAY,
                format!("Could not decode model reply: {err}"),
            ),
            AppError::MissingApiKey => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ANTHROPIC_API_KEY not configured".to_string(),
            ),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<DecodeError> for AppError {
    fn from(err: DecodeError) -> Self {
        AppError::Decode(err)
    }
}
