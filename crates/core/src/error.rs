use thiserror::Error;

/// Decode failures for model-produced payloads.
///
/// Extraction and ranking replies are decoded into a tagged result so a
/// malformed reply can never be mistaken for an empty one.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("empty payload, nothing to decode")]
    Empty,

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload has the wrong shape: {0}")]
    Shape(String),
}
