//! Local-model adapter (Ollama).

use super::{build_http_client, send_upstream, ProviderAdapter, ProviderKind};
use crate::proxy::config::OllamaConfig;
use async_trait::async_trait;
use grperform_types::protocol::ollama::{OllamaChatRequest, OllamaChatResponse, OllamaOptions};
use grperform_types::{CanonicalResponse, ChatRequest, ProxyError};
use tracing::debug;

pub struct OllamaAdapter {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaAdapter {
    pub fn new(config: OllamaConfig) -> Result<Self, ProxyError> {
        let client = build_http_client(config.call_timeout)?;
        Ok(Self { client, config })
    }

    /// Ollama model ids carry a namespace separator (`qwen2.5:14b`). A
    /// requested model without one was meant for a hosted provider, so the
    /// configured default is substituted.
    fn resolve_model<'a>(&'a self, requested: &'a str) -> &'a str {
        if requested.contains(':') {
            requested
        } else {
            &self.config.default_model
        }
    }

    fn build_request(&self, request: &ChatRequest) -> OllamaChatRequest {
        OllamaChatRequest {
            model: self.resolve_model(&request.model).to_string(),
            messages: request.messages.clone(),
            stream: false,
            format: request.wants_json().then(|| "json".to_string()),
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        }
    }
}

#[async_trait]
impl ProviderAdapter for OllamaAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    async fn call(&self, request: &ChatRequest) -> Result<CanonicalResponse, ProxyError> {
        let wire = self.build_request(request);
        let url = format!("{}/api/chat", self.config.base_url.trim_end_matches('/'));

        debug!(model = %wire.model, "calling ollama chat");
        let reply = send_upstream(self.kind(), self.client.post(url).json(&wire)).await?;
        let body = reply.into_body(self.kind())?;

        let parsed: OllamaChatResponse = serde_json::from_value(body).unwrap_or_default();
        Ok(CanonicalResponse::wrap("ollama", &wire.model, parsed.message.content, None))
    }
}
