mod operations;
mod trials;

pub mod health;
pub mod metrics;

use axum::{
    Router,
    routing::{get, post},
};

use crate::registry::RegistryClient;

/// Build API routes
pub fn api_routes() -> Router<RegistryClient> {
    Router::new()
        .route("/extract", post(operations::extract))
        .route("/search", post(operations::search))
        .route("/rerank", post(operations::rerank))
        .route("/trials/search", post(trials::search))
        .route("/trials/{id}", get(trials::detail))
}
