use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Retries on transient model failures (network, 429, 5xx). Total attempts = retries + 1.
    pub llm_max_retries: u32,
    pub llm_timeout: Duration,
    /// Response cache entry lifetime. Zero disables the cache.
    pub llm_cache_ttl: Duration,
    pub llm_cache_capacity: usize,
    /// Resumes analyzed at once within a batch. 1 = strictly sequential.
    pub analysis_concurrency: usize,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_max_retries: parse_env("LLM_MAX_RETRIES", 2)?,
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 120)?),
            llm_cache_ttl: Duration::from_secs(parse_env("LLM_CACHE_TTL_SECS", 3600)?),
            llm_cache_capacity: parse_env("LLM_CACHE_CAPACITY", 256)?,
            analysis_concurrency: parse_env::<usize>("ANALYSIS_CONCURRENCY", 1)?.max(1),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 20 * 1024 * 1024)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
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
