use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if the API key is missing or a numeric value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub llm_timeout: Duration,
    /// Exchanges kept per session. 0 keeps the whole conversation.
    pub memory_max_exchanges: usize,
    pub session_ttl: Duration,
    pub session_sweep_interval: Duration,
    pub max_upload_bytes: usize,
    pub antiword_path: String,
    pub antiword_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            google_api_key: require_env("GOOGLE_API_KEY")?,
            port: env_or("PORT", 8000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_timeout: Duration::from_secs(env_or("LLM_TIMEOUT_SECS", 60)?),
            memory_max_exchanges: env_or("MEMORY_MAX_EXCHANGES", 0)?,
            session_ttl: Duration::from_secs(env_or("SESSION_TTL_SECS", 3600)?),
            session_sweep_interval: Duration::from_secs(env_or("SESSION_SWEEP_SECS", 60)?),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            antiword_path: std::env::var("ANTIWORD_PATH")
                .unwrap_or_else(|_| "antiword".to_string()),
            antiword_timeout: Duration::from_secs(env_or("ANTIWORD_TIMEOUT_SECS", 30)?),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} must be a valid number, got '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_accepts_padded_number() {
        let port: u16 = parse_value("PORT", " 8080 ").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_value_rejects_garbage_with_key_in_message() {
        let err = parse_value::<u64>("SESSION_TTL_SECS", "soon").unwrap_err();
        assert!(err.to_string().contains("SESSION_TTL_SECS"));
    }

    #[test]
    fn test_parse_value_rejects_out_of_range_port() {
        assert!(parse_value::<u16>("PORT", "70000").is_err());
    }
}
