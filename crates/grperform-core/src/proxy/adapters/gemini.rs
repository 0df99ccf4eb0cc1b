//! Alternate-vendor adapter (Google Gemini).
//!
//! Gemini's wire format differs the most from the canonical schema: system
//! messages move into a separate `systemInstruction` field, roles are
//! remapped, and the credential travels in the query string.

use super::{build_http_client, send_upstream, ProviderAdapter, ProviderKind};
use crate::proxy::config::GeminiConfig;
use async_trait::async_trait;
use grperform_types::protocol::gemini::{
    GeminiContent, GeminiGenerationConfig, GeminiPart, GeminiRole, GeminiSystemInstruction,
    GenerateContentRequest, GenerateContentResponse,
};
use grperform_types::{CanonicalResponse, ChatRequest, ChatRole, ProxyError, Usage};
use tracing::debug;

pub struct GeminiAdapter {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiAdapter {
    pub fn new(config: GeminiConfig) -> Result<Self, ProxyError> {
        let client = build_http_client(config.call_timeout)?;
        Ok(Self { client, config })
    }

    fn resolve_model<'a>(&'a self, requested: &'a str) -> &'a str {
        let requested = requested.trim();
        if requested.is_empty() {
            &self.config.default_model
        } else {
            requested
        }
    }
}

/// Translate the canonical request into Gemini's shape.
///
/// System messages are extracted and double-newline-joined into a single
/// system instruction; they never enter the turn sequence. `assistant` maps
/// to the `model` role, `user` and `developer` both map to `user`, and
/// empty-content messages are dropped entirely. Gemini rejects an empty turn
/// list, so a single blank user turn stands in when nothing survives.
pub(crate) fn build_request(request: &ChatRequest) -> GenerateContentRequest {
    let mut system_parts: Vec<&str> = Vec::new();
    let mut contents: Vec<GeminiContent> = Vec::new();

    for message in &request.messages {
        if message.content.is_empty() {
            continue;
        }
        let role = match message.role {
            ChatRole::System => {
                system_parts.push(&message.content);
                continue;
            }
            ChatRole::Assistant => GeminiRole::Model,
            ChatRole::User | ChatRole::Developer => GeminiRole::User,
        };
        contents.push(GeminiContent { role, parts: vec![GeminiPart { text: message.content.clone() }] });
    }

    if contents.is_empty() {
        contents.push(GeminiContent {
            role: GeminiRole::User,
            parts: vec![GeminiPart { text: String::new() }],
        });
    }

    GenerateContentRequest {
        contents,
        system_instruction: (!system_parts.is_empty()).then(|| GeminiSystemInstruction {
            parts: vec![GeminiPart { text: system_parts.join("\n\n") }],
        }),
        generation_config: GeminiGenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
            response_mime_type: request.wants_json().then(|| "application/json".to_string()),
        },
    }
}

fn extract_text(response: &GenerateContentResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .map(|p| p.text.clone())
        .unwrap_or_default()
}

/// Usage is copied when the upstream reports it and omitted otherwise; the
/// canonical schema never carries fabricated zero counts.
fn extract_usage(response: &GenerateContentResponse) -> Option<Usage> {
    response.usage_metadata.as_ref().map(|u| Usage {
        prompt_tokens: u.prompt_token_count,
        completion_tokens: u.candidates_token_count,
        total_tokens: u.total_token_count,
    })
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn call(&self, request: &ChatRequest) -> Result<CanonicalResponse, ProxyError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ProxyError::misconfigured("GEMINI_API_KEY missing"))?;

        let model = self.resolve_model(&request.model);
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        );
        let wire = build_request(request);

        debug!(model, turns = wire.contents.len(), "calling gemini generateContent");
        let reply =
            send_upstream(self.kind(), self.client.post(url).query(&[("key", api_key)]).json(&wire))
                .await?;
        let body = reply.into_body(self.kind())?;

        let parsed: GenerateContentResponse = serde_json::from_value(body).unwrap_or_default();
        Ok(CanonicalResponse::wrap("gemini", model, extract_text(&parsed), extract_usage(&parsed)))
    }
}
