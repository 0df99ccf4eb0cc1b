//! OpenAI-compatible adapter (Groq).
//!
//! The canonical schema *is* this upstream's wire format, so the request
//! serializes straight through and the response deserializes straight back.

use super::{build_http_client, send_upstream, ProviderAdapter, ProviderKind};
use crate::proxy::config::GroqConfig;
use async_trait::async_trait;
use grperform_types::{CanonicalResponse, ChatRequest, ProxyError};
use tracing::debug;

pub struct GroqAdapter {
    client: reqwest::Client,
    config: GroqConfig,
}

impl GroqAdapter {
    pub fn new(config: GroqConfig) -> Result<Self, ProxyError> {
        let client = build_http_client(config.call_timeout)?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ProviderAdapter for GroqAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Groq
    }

    async fn call(&self, request: &ChatRequest) -> Result<CanonicalResponse, ProxyError> {
        // Credential check happens before any network I/O.
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ProxyError::misconfigured("GROQ_API_KEY missing"))?;

        debug!(model = %request.model, "calling groq chat completions");
        let reply = send_upstream(
            self.kind(),
            self.client
                .post(self.endpoint())
                .bearer_auth(api_key)
                .header(reqwest::header::USER_AGENT, "GRPerform/1.0")
                .json(request),
        )
        .await?;

        let body = reply.into_body(self.kind())?;
        serde_json::from_value(body)
            .map_err(|e| ProxyError::internal(format!("groq returned an unexpected payload: {e}")))
    }
}
