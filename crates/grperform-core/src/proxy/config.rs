//! Proxy configuration. Built once at startup, immutable thereafter.

use crate::proxy::adapters::ProviderKind;
use std::time::Duration;

/// OpenAI-compatible (Groq) provider settings.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub call_timeout: Duration,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            call_timeout: Duration::from_secs(60),
        }
    }
}

/// Local-model (Ollama) provider settings. The longer timeout reflects local
/// inference being slower than hosted APIs.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub default_model: String,
    pub call_timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            default_model: "qwen2.5:14b".to_string(),
            call_timeout: Duration::from_secs(120),
        }
    }
}

/// Alternate-vendor (Gemini) provider settings.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub default_model: String,
    pub call_timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            default_model: "gemini-2.0-flash".to_string(),
            call_timeout: Duration::from_secs(60),
        }
    }
}

/// Process-wide proxy configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Provider used when neither the route nor the request body picks one.
    pub default_provider: ProviderKind,
    /// Secondary provider tried once on qualifying upstream failures.
    pub fallback_provider: Option<ProviderKind>,
    /// Minimum spacing between upstream call starts. Zero disables pacing.
    pub min_interval: Duration,
    /// Maximum number of 429 retries for the Groq adapter.
    pub max_429_retries: u32,
    pub groq: GroqConfig,
    pub ollama: OllamaConfig,
    pub gemini: GeminiConfig,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            default_provider: ProviderKind::Groq,
            fallback_provider: None,
            min_interval: Duration::from_millis(900),
            max_429_retries: 2,
            groq: GroqConfig::default(),
            ollama: OllamaConfig::default(),
            gemini: GeminiConfig::default(),
        }
    }
}
