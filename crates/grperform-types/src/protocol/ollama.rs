//! Ollama `/api/chat` API types (non-streaming).

use crate::protocol::chat::ChatMessage;
use serde::{Deserialize, Serialize};

/// Sampling options forwarded to Ollama.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OllamaOptions {
    pub temperature: f64,
    pub num_predict: u32,
}

/// Request body for `POST /api/chat`. Roles pass through 1:1, so the
/// canonical messages are reused verbatim.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OllamaChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    /// `"json"` when the client requested structured output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub options: OllamaOptions,
}

/// The assistant message inside an Ollama chat response.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OllamaMessage {
    #[serde(default)]
    pub content: String,
}

/// Response body of `POST /api/chat` with `stream: false`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OllamaChatResponse {
    #[serde(default)]
    pub message: OllamaMessage,
}
