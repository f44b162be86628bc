use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::compile::{LatexCompiler, PdfLatexCompiler};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::rate_limit::RateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is built explicitly from `Config`; there are no process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Pluggable compiler backend. Default: `PdfLatexCompiler`.
    pub compiler: Arc<dyn LatexCompiler>,
    /// Budget shared by every `/api/*` route.
    pub api_limiter: Arc<RateLimiter>,
    /// Extra budget for the compile and optimize routes.
    pub heavy_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let llm = LlmClient::new(config.anthropic_api_key.clone(), &config.anthropic_base_url)
            .context("Failed to build LLM HTTP client")?;

        let compiler = Arc::new(PdfLatexCompiler::new(
            &config.latex_compiler,
            Duration::from_secs(config.compile_timeout_secs),
        ));

        let window = Duration::from_secs(config.rate_limit_window_secs);

        Ok(AppState {
            llm,
            compiler,
            api_limiter: Arc::new(RateLimiter::new(
                "api",
                config.rate_limit_max_requests,
                window,
            )),
            heavy_limiter: Arc::new(RateLimiter::new(
                "heavy",
                config.heavy_rate_limit_max_requests,
                window,
            )),
        })
    }

    /// Replaces the compiler backend.
    #[cfg(test)]
    pub fn with_compiler(mut self, compiler: Arc<dyn LatexCompiler>) -> Self {
        self.compiler = compiler;
        self
    }
}
