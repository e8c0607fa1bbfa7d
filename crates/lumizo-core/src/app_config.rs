use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the Lumizo REST API, including the `/api` path.
    pub api_base_url: String,
    pub env: Environment,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts for transient GET failures. Mutations never retry.
    pub max_retries: u32,
    /// Ceiling of the first retry delay.
    pub retry_backoff_base_ms: u64,
    /// Factor applied to the delay ceiling after each retry.
    pub retry_backoff_multiplier: u32,
    pub retry_max_delay_ms: u64,
    pub page_limit: i64,
    pub cart_path: PathBuf,
    /// Optional YAML file replacing the built-in fallback dataset.
    pub fallback_path: Option<PathBuf>,
    pub image_timeout_secs: u64,
    pub company_name: String,
}
