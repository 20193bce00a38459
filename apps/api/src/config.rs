use anyhow::{Context, Result};

const DEFAULT_OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_LLM_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_APIFY_API_URL: &str = "https://api.apify.com/v2";
const DEFAULT_LINKEDIN_ACTOR_ID: &str = "BHzefUZlZRKWxkTck";
const DEFAULT_NAUKRI_ACTOR_ID: &str = "wsrn5gy5C4EDeYCcD";

/// Application configuration loaded from environment variables.
/// Startup fails if either API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: String,
    pub openrouter_api_url: String,
    pub llm_model: String,
    pub apify_api_key: String,
    pub apify_api_url: String,
    pub linkedin_actor_id: String,
    pub naukri_actor_id: String,
    /// Per-request timeout for every remote call.
    pub remote_timeout_secs: u64,
    /// Upper bound on how long a provider run is polled before giving up.
    pub apify_run_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openrouter_api_key: require_env("OPENROUTER_API_KEY")?,
            openrouter_api_url: env_or("OPENROUTER_API_URL", DEFAULT_OPENROUTER_API_URL),
            llm_model: env_or("LLM_MODEL", DEFAULT_LLM_MODEL),
            apify_api_key: require_env("APIFY_API_KEY")?,
            apify_api_url: env_or("APIFY_API_URL", DEFAULT_APIFY_API_URL),
            linkedin_actor_id: env_or("LINKEDIN_ACTOR_ID", DEFAULT_LINKEDIN_ACTOR_ID),
            naukri_actor_id: env_or("NAUKRI_ACTOR_ID", DEFAULT_NAUKRI_ACTOR_ID),
            remote_timeout_secs: parse_env("REMOTE_TIMEOUT_SECS", 30)?,
            apify_run_timeout_secs: parse_env("APIFY_RUN_TIMEOUT_SECS", 300)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
