//! Request routing: provider selection, throttle/retry orchestration and the
//! single-shot fallback policy.
//!
//! State machine per request: Validating → Throttling → Attempting(provider)
//! → {Succeeded | Retrying | FallingBack(provider')} → {Succeeded | Failed}.
//! Exactly one provider is attempted initially and at most one fallback
//! attempt ever occurs.

use crate::proxy::adapters::{GeminiAdapter, GroqAdapter, OllamaAdapter, ProviderAdapter, ProviderKind};
use crate::proxy::config::AiConfig;
use crate::proxy::retry::call_with_429_retry;
use crate::proxy::throttle::ThrottleGate;
use crate::proxy::validate::parse_chat_request;
use grperform_types::{CanonicalResponse, ChatRequest, ProxyError};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Upstream statuses that qualify a failure for the fallback provider.
pub const FALLBACK_STATUSES: &[u16] = &[401, 403, 429, 500];

/// Terminal failure of a routed request: the HTTP status to answer with plus
/// the client-facing error body. A failed fallback never masks the original
/// error; both are reported together.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatFailure {
    #[serde(skip)]
    pub status: u16,
    pub error: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub details: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_error: Option<String>,
}

impl From<ProxyError> for ChatFailure {
    fn from(err: ProxyError) -> Self {
        Self {
            status: err.http_status_code(),
            error: err.summary(),
            details: err.details_json(),
            fallback_error: None,
        }
    }
}

/// A failure qualifies for fallback only when it is an upstream-class error
/// (or a pre-flight misconfiguration) with a status in [`FALLBACK_STATUSES`].
/// Transport failures and validation errors never fall back.
fn qualifies_for_fallback(err: &ProxyError) -> bool {
    matches!(err, ProxyError::Upstream { .. } | ProxyError::Misconfigured { .. })
        && FALLBACK_STATUSES.contains(&err.http_status_code())
}

/// Routes validated requests to one of the three provider adapters.
///
/// Holds the only mutable state shared across requests: the throttle gate.
/// The adapter map is fixed at construction; dispatch is never open-ended.
pub struct ChatRouter {
    config: AiConfig,
    gate: Arc<ThrottleGate>,
    adapters: HashMap<ProviderKind, Arc<dyn ProviderAdapter>>,
}

impl ChatRouter {
    pub fn new(config: AiConfig) -> Result<Self, ProxyError> {
        let gate = Arc::new(ThrottleGate::new(config.min_interval));

        let mut adapters: HashMap<ProviderKind, Arc<dyn ProviderAdapter>> = HashMap::new();
        adapters.insert(ProviderKind::Groq, Arc::new(GroqAdapter::new(config.groq.clone())?));
        adapters.insert(ProviderKind::Ollama, Arc::new(OllamaAdapter::new(config.ollama.clone())?));
        adapters.insert(ProviderKind::Gemini, Arc::new(GeminiAdapter::new(config.gemini.clone())?));

        Ok(Self { config, gate, adapters })
    }

    /// Provider selection precedence: route-forced override > `provider`
    /// field in the request body > process-wide default.
    pub fn select(
        &self,
        forced: Option<ProviderKind>,
        request: &ChatRequest,
    ) -> Result<ProviderKind, ProxyError> {
        if let Some(kind) = forced {
            return Ok(kind);
        }
        if let Some(hint) = &request.provider {
            return hint.parse();
        }
        Ok(self.config.default_provider)
    }

    /// Validate and route one inbound request to a terminal outcome.
    pub async fn dispatch(
        &self,
        forced: Option<ProviderKind>,
        body: &Value,
    ) -> Result<CanonicalResponse, ChatFailure> {
        let request = parse_chat_request(body).map_err(ChatFailure::from)?;
        let provider = self.select(forced, &request).map_err(ChatFailure::from)?;

        match self.attempt(provider, &request).await {
            Ok(response) => {
                info!(provider = %provider, model = %request.model, "chat request succeeded");
                Ok(response)
            }
            Err(err) => self.try_fallback(provider, &request, err).await,
        }
    }

    /// One routed attempt against a provider. The throttle gate is acquired
    /// once per physical upstream call; the Groq path additionally carries
    /// the 429 retry policy (each retry reacquires the gate).
    async fn attempt(
        &self,
        provider: ProviderKind,
        request: &ChatRequest,
    ) -> Result<CanonicalResponse, ProxyError> {
        let adapter = self.adapter(provider)?;

        if provider == ProviderKind::Groq {
            return call_with_429_retry(
                adapter.as_ref(),
                &self.gate,
                request,
                self.config.max_429_retries,
            )
            .await;
        }

        self.gate.acquire().await;
        adapter.call(request).await
    }

    async fn try_fallback(
        &self,
        failed: ProviderKind,
        request: &ChatRequest,
        err: ProxyError,
    ) -> Result<CanonicalResponse, ChatFailure> {
        error!(provider = %failed, status = err.http_status_code(), %err, "chat request failed");

        let fallback = match self.config.fallback_provider {
            Some(kind) if kind != failed && qualifies_for_fallback(&err) => kind,
            _ => return Err(ChatFailure::from(err)),
        };

        warn!(from = %failed, to = %fallback, "attempting fallback provider");
        let adapter = match self.adapter(fallback) {
            Ok(adapter) => adapter,
            Err(lookup_err) => {
                let mut failure = ChatFailure::from(err);
                failure.fallback_error = Some(lookup_err.to_string());
                return Err(failure);
            }
        };

        // The fallback is a fresh physical attempt: reacquire the gate, call
        // once, never retry or chain to a third provider.
        self.gate.acquire().await;
        match adapter.call(request).await {
            Ok(response) => {
                info!(provider = %fallback, "fallback provider succeeded");
                Ok(response)
            }
            Err(fallback_err) => {
                error!(provider = %fallback, %fallback_err, "fallback provider failed as well");
                let mut failure = ChatFailure::from(err);
                failure.fallback_error = Some(fallback_err.to_string());
                Err(failure)
            }
        }
    }

    fn adapter(&self, provider: ProviderKind) -> Result<&Arc<dyn ProviderAdapter>, ProxyError> {
        self.adapters
            .get(&provider)
            .ok_or_else(|| ProxyError::internal(format!("no adapter registered for {provider}")))
    }
}
