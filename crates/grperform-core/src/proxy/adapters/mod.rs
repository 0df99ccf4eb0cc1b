//! Provider adapters.
//!
//! Each adapter translates the canonical request into one upstream's wire
//! format, invokes it, and translates the response back into the canonical
//! schema. The provider set is closed: exactly these three implementations
//! exist, and the router dispatches over [`ProviderKind`], never over free
//! strings.

mod gemini;
mod groq;
mod ollama;

pub use gemini::GeminiAdapter;
pub use groq::GroqAdapter;
pub use ollama::OllamaAdapter;

use async_trait::async_trait;
use grperform_types::{CanonicalResponse, ChatRequest, ProxyError};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// The closed set of upstream providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// OpenAI-compatible hosted API (Groq).
    Groq,
    /// Local model server (Ollama).
    Ollama,
    /// Alternate vendor (Google Gemini).
    Gemini,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::Ollama => "ollama",
            Self::Gemini => "gemini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "ollama" => Ok(Self::Ollama),
            "gemini" => Ok(Self::Gemini),
            other => Err(ProxyError::validation(format!("Unknown AI provider: {other}"))),
        }
    }
}

/// Common adapter contract: canonical request in, canonical response out.
/// Fails with an upstream error carrying the raw body for any status >= 400,
/// or an unreachable error on transport failure.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn call(&self, request: &ChatRequest) -> Result<CanonicalResponse, ProxyError>;
}

/// Decoded upstream HTTP reply, before status classification.
pub(crate) struct UpstreamReply {
    pub status: u16,
    pub body: Value,
    pub retry_after_secs: Option<f64>,
}

impl UpstreamReply {
    /// Classify the reply: any status >= 400 becomes an upstream error with
    /// the body preserved verbatim.
    pub fn into_body(self, kind: ProviderKind) -> Result<Value, ProxyError> {
        if self.status >= 400 {
            return Err(ProxyError::Upstream {
                provider: kind.to_string(),
                status: self.status,
                details: self.body,
                retry_after_secs: self.retry_after_secs,
            });
        }
        Ok(self.body)
    }
}

/// Execute a prepared upstream request and decode its body. A body that is
/// not valid JSON is wrapped as `{"raw": <text>}` rather than dropped.
pub(crate) async fn send_upstream(
    kind: ProviderKind,
    request: reqwest::RequestBuilder,
) -> Result<UpstreamReply, ProxyError> {
    let response = request.send().await.map_err(|e| ProxyError::Unreachable {
        provider: kind.to_string(),
        message: e.to_string(),
    })?;

    let status = response.status().as_u16();
    let retry_after_secs = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<f64>().ok());

    let text = response.text().await.map_err(|e| ProxyError::Unreachable {
        provider: kind.to_string(),
        message: e.to_string(),
    })?;
    let body = serde_json::from_str(&text).unwrap_or_else(|_| json!({ "raw": text }));

    Ok(UpstreamReply { status, body, retry_after_secs })
}

/// Build the shared HTTP client for one adapter.
pub(crate) fn build_http_client(timeout: std::time::Duration) -> Result<reqwest::Client, ProxyError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProxyError::internal(format!("failed to build HTTP client: {e}")))
}
