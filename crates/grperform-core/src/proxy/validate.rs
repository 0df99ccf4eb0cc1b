//! Inbound request validation.
//!
//! `model` and `messages` are hard requirements; the tuning fields follow a
//! deliberate leniency policy — a wrong-typed `temperature` or `max_tokens`
//! is silently replaced by its default instead of rejected. The substitution
//! happens here, explicitly, so the behavior stays visible and testable.

use grperform_types::{ChatMessage, ChatRequest, ProxyError};
use serde_json::{json, Value};

pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Request body size ceiling. Enforced by the server layer before the body is
/// fully buffered.
pub const MAX_BODY_BYTES: usize = 1_000_000;

/// Parse raw inbound JSON into a [`ChatRequest`], or fail with a validation
/// error. No side effects; never contacts an upstream.
pub fn parse_chat_request(body: &Value) -> Result<ChatRequest, ProxyError> {
    let model = body
        .get("model")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(required_fields_error)?;

    let raw_messages =
        body.get("messages").and_then(Value::as_array).ok_or_else(required_fields_error)?;
    // An empty list is as useless as a missing one and reads the same to clients.
    if raw_messages.is_empty() {
        return Err(required_fields_error());
    }

    let mut messages = Vec::with_capacity(raw_messages.len());
    for (i, raw) in raw_messages.iter().enumerate() {
        let message: ChatMessage = serde_json::from_value(raw.clone()).map_err(|e| {
            ProxyError::validation(format!("Invalid body: messages[{i}] is not a chat message ({e})"))
        })?;
        messages.push(message);
    }

    // Leniency policy: wrong-typed tuning fields default silently.
    let temperature = body.get("temperature").and_then(Value::as_f64).unwrap_or(DEFAULT_TEMPERATURE);
    let max_tokens = body
        .get("max_tokens")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(DEFAULT_MAX_TOKENS);

    let provider = body
        .get("provider")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty());

    // An explicit response_format object takes precedence; otherwise the
    // jsonMode flag synthesizes the equivalent structured directive.
    let json_mode = body.get("jsonMode").and_then(Value::as_bool).unwrap_or(false);
    let response_format = match body.get("response_format") {
        Some(v) if v.is_object() => Some(v.clone()),
        _ if json_mode => Some(json!({"type": "json_object"})),
        _ => None,
    };

    Ok(ChatRequest {
        model: model.to_string(),
        messages,
        temperature,
        max_tokens,
        provider,
        response_format,
    })
}

fn required_fields_error() -> ProxyError {
    ProxyError::validation("Invalid body: model and messages are required")
}

#[cfg(test)]
mod tests {
    use super::*;
    use grperform_types::ChatRole;

    fn minimal_body() -> Value {
        json!({
            "model": "llama-3.3-70b",
            "messages": [{"role": "user", "content": "hi"}]
        })
    }

    #[test]
    fn accepts_minimal_request_with_defaults() {
        let req = parse_chat_request(&minimal_body()).unwrap();
        assert_eq!(req.model, "llama-3.3-70b");
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(req.max_tokens, DEFAULT_MAX_TOKENS);
        assert!(req.provider.is_none());
        assert!(req.response_format.is_none());
    }

    #[test]
    fn rejects_missing_model() {
        let body = json!({"messages": [{"role": "user", "content": "hi"}]});
        let err = parse_chat_request(&body).unwrap_err();
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn rejects_empty_model() {
        let mut body = minimal_body();
        body["model"] = json!("   ");
        assert!(parse_chat_request(&body).is_err());
    }

    #[test]
    fn rejects_non_array_messages() {
        let body = json!({"model": "m", "messages": "not a list"});
        let err = parse_chat_request(&body).unwrap_err();
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn rejects_empty_messages() {
        let body = json!({"model": "m", "messages": []});
        assert!(parse_chat_request(&body).is_err());
    }

    #[test]
    fn rejects_unknown_role() {
        let body = json!({"model": "m", "messages": [{"role": "robot", "content": "x"}]});
        assert!(parse_chat_request(&body).is_err());
    }

    #[test]
    fn wrong_typed_tuning_fields_default_silently() {
        let mut body = minimal_body();
        body["temperature"] = json!("hot");
        body["max_tokens"] = json!("many");

        let req = parse_chat_request(&body).unwrap();
        assert_eq!(req.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(req.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn explicit_tuning_fields_are_kept() {
        let mut body = minimal_body();
        body["temperature"] = json!(0.7);
        body["max_tokens"] = json!(512);

        let req = parse_chat_request(&body).unwrap();
        assert_eq!(req.temperature, 0.7);
        assert_eq!(req.max_tokens, 512);
    }

    #[test]
    fn json_mode_synthesizes_response_format() {
        let mut body = minimal_body();
        body["jsonMode"] = json!(true);

        let req = parse_chat_request(&body).unwrap();
        assert_eq!(req.response_format, Some(json!({"type": "json_object"})));
        assert!(req.wants_json());
    }

    #[test]
    fn explicit_response_format_wins_over_json_mode() {
        let mut body = minimal_body();
        body["jsonMode"] = json!(true);
        body["response_format"] = json!({"type": "json_schema", "json_schema": {"name": "plan"}});

        let req = parse_chat_request(&body).unwrap();
        assert_eq!(
            req.response_format.as_ref().and_then(|f| f.get("type")).and_then(Value::as_str),
            Some("json_schema")
        );
        assert!(!req.wants_json());
    }

    #[test]
    fn message_order_is_preserved() {
        let body = json!({
            "model": "m",
            "messages": [
                {"role": "system", "content": "A"},
                {"role": "user", "content": "B"},
                {"role": "assistant", "content": "C"},
                {"role": "developer", "content": "D"}
            ]
        });

        let req = parse_chat_request(&body).unwrap();
        let roles: Vec<ChatRole> = req.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![ChatRole::System, ChatRole::User, ChatRole::Assistant, ChatRole::Developer]
        );
        assert_eq!(req.messages[2].content, "C");
    }

    #[test]
    fn provider_hint_is_normalized() {
        let mut body = minimal_body();
        body["provider"] = json!(" Ollama ");
        let req = parse_chat_request(&body).unwrap();
        assert_eq!(req.provider.as_deref(), Some("ollama"));
    }
}
