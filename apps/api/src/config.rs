use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub anthropic_base_url: String,
    /// Allowed CORS origin. `None` falls back to a permissive policy.
    pub frontend_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// LaTeX engine invoked by the compile endpoint.
    pub latex_compiler: String,
    pub compile_timeout_secs: u64,
    pub rate_limit_window_secs: u64,
    pub rate_limit_max_requests: u32,
    /// Tighter budget for the compile and optimize routes.
    pub heavy_rate_limit_max_requests: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            anthropic_base_url: std::env::var("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|_| "https://api.anthropic.com".to_string()),
            frontend_url: std::env::var("FRONTEND_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            port: parse_env("PORT", 5000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            latex_compiler: std::env::var("LATEX_COMPILER")
                .unwrap_or_else(|_| "pdflatex".to_string()),
            compile_timeout_secs: parse_env("COMPILE_TIMEOUT_SECS", 60)?,
            rate_limit_window_secs: parse_env("RATE_LIMIT_WINDOW_SECS", 900)?,
            rate_limit_max_requests: parse_env("RATE_LIMIT_MAX_REQUESTS", 100)?,
            heavy_rate_limit_max_requests: parse_env("HEAVY_RATE_LIMIT_MAX_REQUESTS", 20)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an optional variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for router tests: no network, generous limits.
    pub fn for_tests() -> Self {
        Config {
            anthropic_api_key: "test-key".to_string(),
            anthropic_base_url: "http://127.0.0.1:9".to_string(),
            frontend_url: None,
            port: 0,
            rust_log: "debug".to_string(),
            latex_compiler: "pdflatex".to_string(),
            compile_timeout_secs: 5,
            rate_limit_window_secs: 60,
            rate_limit_max_requests: 1000,
            heavy_rate_limit_max_requests: 1000,
        }
    }
}
