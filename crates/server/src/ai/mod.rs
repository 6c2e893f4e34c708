//! LLM-backed pipeline steps (extraction and relevance ranking)

pub mod client;
pub mod extract;
pub mod rank;

pub use client::ClaudeClient;
