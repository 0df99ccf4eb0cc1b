//! Canonical chat-completion schema (OpenAI ChatCompletions shape).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical message role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Developer,
}

/// One turn of a chat conversation. Order within a request is semantically
/// significant and preserved end to end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// A validated chat request. Never mutated after validation; adapters read it
/// and build their own wire payloads.
///
/// Serializing this struct yields exactly the OpenAI-compatible request body
/// (`provider` is a routing hint, not a wire field).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
    #[serde(skip)]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,
}

impl ChatRequest {
    /// Whether the client asked for structured JSON output. The validator has
    /// already folded the `jsonMode` flag into `response_format`.
    pub fn wants_json(&self) -> bool {
        self.response_format
            .as_ref()
            .and_then(|f| f.get("type"))
            .and_then(Value::as_str)
            .is_some_and(|t| t == "json_object")
    }
}

/// Token accounting, copied from the upstream when it reports any.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The assistant turn inside a choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantMessage {
    pub role: String,
    pub content: String,
}

/// One completion choice. This proxy never streams, so there is always
/// exactly one choice at index 0 with finish reason `"stop"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    pub index: u32,
    pub message: AssistantMessage,
    #[serde(default = "default_finish_reason")]
    pub finish_reason: String,
}

fn default_finish_reason() -> String {
    "stop".to_string()
}

fn default_object() -> String {
    "chat.completion".to_string()
}

/// The single response shape every adapter must produce.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalResponse {
    pub id: String,
    #[serde(default = "default_object")]
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl CanonicalResponse {
    /// Wrap plain assistant text into the canonical envelope, synthesizing the
    /// id and timestamp. Used by adapters whose upstreams do not speak the
    /// canonical shape.
    pub fn wrap(id_prefix: &str, model: &str, content: String, usage: Option<Usage>) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: format!("{id_prefix}-{now}"),
            object: default_object(),
            created: now,
            model: model.to_string(),
            choices: vec![Choice {
                index: 0,
                message: AssistantMessage { role: "assistant".to_string(), content },
                finish_reason: default_finish_reason(),
            }],
            usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_to_openai_wire_shape() {
        let req = ChatRequest {
            model: "llama-3.3-70b".to_string(),
            messages: vec![ChatMessage { role: ChatRole::User, content: "hi".to_string() }],
            temperature: 0.2,
            max_tokens: 2048,
            provider: Some("groq".to_string()),
            response_format: None,
        };

        let wire = serde_json::to_value(&req).unwrap();
        assert_eq!(
            wire,
            json!({
                "model": "llama-3.3-70b",
                "messages": [{"role": "user", "content": "hi"}],
                "temperature": 0.2,
                "max_tokens": 2048,
            })
        );
    }

    #[test]
    fn response_format_rides_on_the_wire_when_present() {
        let req = ChatRequest {
            model: "m".to_string(),
            messages: vec![ChatMessage { role: ChatRole::User, content: "hi".to_string() }],
            temperature: 0.2,
            max_tokens: 2048,
            provider: None,
            response_format: Some(json!({"type": "json_object"})),
        };

        let wire = serde_json::to_value(&req).unwrap();
        assert_eq!(wire["response_format"], json!({"type": "json_object"}));
        assert!(req.wants_json());
    }

    #[test]
    fn wrap_synthesizes_stop_choice() {
        let resp = CanonicalResponse::wrap("ollama", "qwen2.5:14b", "pong".to_string(), None);

        assert!(resp.id.starts_with("ollama-"));
        assert_eq!(resp.object, "chat.completion");
        assert_eq!(resp.choices.len(), 1);
        assert_eq!(resp.choices[0].index, 0);
        assert_eq!(resp.choices[0].message.role, "assistant");
        assert_eq!(resp.choices[0].message.content, "pong");
        assert_eq!(resp.choices[0].finish_reason, "stop");
    }

    #[test]
    fn usage_is_omitted_when_absent() {
        let resp = CanonicalResponse::wrap("ollama", "m", String::new(), None);
        let wire = serde_json::to_value(&resp).unwrap();
        assert!(wire.get("usage").is_none());
    }

    #[test]
    fn deserializes_openai_compatible_payload() {
        let body = json!({
            "id": "chatcmpl-abc123",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": "llama-3.3-70b",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "hello"},
                "logprobs": null,
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12},
            "system_fingerprint": "fp_1"
        });

        let resp: CanonicalResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.id, "chatcmpl-abc123");
        assert_eq!(resp.choices[0].message.content, "hello");
        assert_eq!(resp.usage.as_ref().unwrap().total_tokens, 12);
    }
}
