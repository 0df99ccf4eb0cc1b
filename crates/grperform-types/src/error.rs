//! Proxy error taxonomy.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while routing a chat request.
///
/// Upstream failures preserve the raw response body verbatim so diagnostics
/// are never lost on the way back to the client.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ProxyError {
    /// Malformed or missing required request fields. Never contacts an upstream.
    #[error("{message}")]
    Validation { message: String },

    /// A required credential is absent for the selected provider; detected
    /// before any network call.
    #[error("Server misconfigured: {message}")]
    Misconfigured { message: String },

    /// Upstream responded with an error status (>= 400).
    #[error("{provider} API error (HTTP {status})")]
    Upstream {
        provider: String,
        status: u16,
        details: Value,
        /// Server-supplied `Retry-After` hint, in seconds.
        retry_after_secs: Option<f64>,
    },

    /// Transport-level failure reaching the upstream (DNS, connection refused,
    /// timeout).
    #[error("Upstream {provider} unreachable: {message}")]
    Unreachable { provider: String, message: String },

    /// Any other uncaught failure; captured as text, never as a raw backtrace.
    #[error("Unexpected server error: {message}")]
    Internal { message: String },
}

impl ProxyError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn misconfigured(message: impl Into<String>) -> Self {
        Self::Misconfigured { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    /// Get the HTTP status code to answer the client with. Upstream failures
    /// mirror the upstream's own status.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Misconfigured { .. } => 500,
            Self::Upstream { status, .. } => *status,
            Self::Unreachable { .. } => 502,
            Self::Internal { .. } => 500,
        }
    }

    /// The `error` field of the client-facing error body.
    pub fn summary(&self) -> String {
        match self {
            Self::Validation { message } => message.clone(),
            Self::Misconfigured { .. } => self.to_string(),
            Self::Upstream { .. } => "Upstream error".to_string(),
            Self::Unreachable { .. } => "Upstream unreachable".to_string(),
            Self::Internal { .. } => "Unexpected server error".to_string(),
        }
    }

    /// The `details` field of the client-facing error body. Upstream details
    /// are passed through verbatim; other variants carry a text summary.
    pub fn details_json(&self) -> Value {
        match self {
            Self::Validation { .. } => Value::Null,
            Self::Misconfigured { .. } => Value::Null,
            Self::Upstream { details, .. } => details.clone(),
            Self::Unreachable { message, .. } => Value::String(message.clone()),
            Self::Internal { message } => Value::String(message.clone()),
        }
    }
}
