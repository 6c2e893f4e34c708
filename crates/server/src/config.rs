//! Server configuration

/// Default public registry endpoint
const DEFAULT_REGISTRY_URL: &str = "https://clinicaltrials.gov/api/v2/studies";

/// Server configuration loaded from environment variables
pub struct Config {
    pub bind_address: String,
    /// LLM provider credential; read once at startup and injected into the
    /// client. Absent means extraction and ranking fail with an
    /// authentication error.
    pub anthropic_api_key: Option<String>,
    pub registry_base_url: String,
    pub registry_page_size: u32,
    pub cors_origins: Vec<String>,
    pub rate_limit_rps: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            registry_base_url: std::env::var("REGISTRY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_REGISTRY_URL.into()),
            registry_page_size: std::env::var("REGISTRY_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .collect(),
            rate_limit_rps: std::env::var("RATE_LIMIT_RPS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
        }
    }
}
