//! GR Perform AI Proxy - Headless Daemon
//!
//! A pure Rust HTTP server that routes chat-completion requests to one of
//! several upstream LLM providers (Groq / Ollama / Gemini), normalizing their
//! wire formats into a single canonical shape while pacing, retrying and
//! falling back according to the process-wide policies.
//!
//! Endpoints:
//! - POST /api/ai/chat         (provider-agnostic)
//! - POST /api/ai/groq-chat    (force Groq)
//! - POST /api/ai/ollama-chat  (force Ollama)
//! - POST /api/ai/gemini-chat  (force Gemini)

use anyhow::Result;
use clap::Parser;
use grperform_core::proxy::{AiConfig, ChatRouter, GeminiConfig, GroqConfig, OllamaConfig, ProviderKind};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod handlers;
mod routes;
mod state;

#[cfg(test)]
mod test_helpers;

use state::AppState;

/// Configuration surface, read once at startup and never re-read.
#[derive(Parser, Debug)]
#[command(name = "grperform-server", version, about = "GR Perform AI proxy daemon")]
struct Args {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Default provider when neither route nor request body picks one.
    #[arg(long, env = "AI_PROVIDER", default_value = "groq")]
    ai_provider: ProviderKind,

    /// Optional secondary provider tried once on qualifying failures.
    #[arg(long, env = "AI_FALLBACK_PROVIDER")]
    ai_fallback_provider: Option<String>,

    /// Minimum spacing between upstream call starts. 0 disables pacing.
    #[arg(long, env = "AI_MIN_INTERVAL_MS", default_value_t = 900)]
    ai_min_interval_ms: u64,

    /// Maximum number of 429 retries against the Groq adapter.
    #[arg(long, env = "AI_MAX_429_RETRIES", default_value_t = 2)]
    ai_max_429_retries: u32,

    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    groq_api_key: Option<String>,

    #[arg(long, env = "GROQ_BASE_URL", default_value = "https://api.groq.com/openai/v1")]
    groq_base_url: String,

    #[arg(long, env = "OLLAMA_URL", default_value = "http://localhost:11434")]
    ollama_url: String,

    #[arg(long, env = "OLLAMA_MODEL", default_value = "qwen2.5:14b")]
    ollama_model: String,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    #[arg(
        long,
        env = "GEMINI_BASE_URL",
        default_value = "https://generativelanguage.googleapis.com/v1beta"
    )]
    gemini_base_url: String,

    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-2.0-flash")]
    gemini_model: String,
}

impl Args {
    fn ai_config(&self) -> Result<AiConfig> {
        let fallback_provider = self
            .ai_fallback_provider
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<ProviderKind>)
            .transpose()?;

        let defaults = AiConfig::default();
        Ok(AiConfig {
            default_provider: self.ai_provider,
            fallback_provider,
            min_interval: Duration::from_millis(self.ai_min_interval_ms),
            max_429_retries: self.ai_max_429_retries,
            groq: GroqConfig {
                api_key: self.groq_api_key.clone(),
                base_url: self.groq_base_url.clone(),
                ..defaults.groq
            },
            ollama: OllamaConfig {
                base_url: self.ollama_url.clone(),
                default_model: self.ollama_model.clone(),
                ..defaults.ollama
            },
            gemini: GeminiConfig {
                api_key: self.gemini_api_key.clone(),
                base_url: self.gemini_base_url.clone(),
                default_model: self.gemini_model.clone(),
                ..defaults.gemini
            },
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = args.ai_config()?;

    info!(
        default_provider = %config.default_provider,
        fallback = config.fallback_provider.map(|p| p.as_str()),
        min_interval_ms = config.min_interval.as_millis() as u64,
        max_429_retries = config.max_429_retries,
        "starting GR Perform AI proxy"
    );

    let router = ChatRouter::new(config)?;
    let app = routes::build_router(AppState::new(router));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
