//! Test helpers for grperform-server unit tests.

use std::time::Duration;

use axum_test::TestServer;
use wiremock::MockServer;

use grperform_core::proxy::{AiConfig, ChatRouter, GroqConfig, OllamaConfig, ProviderKind};

use crate::routes::build_router;
use crate::state::AppState;

/// Config pointing both HTTP providers at local mock servers, with pacing
/// and retries switched off so tests run instantly.
pub fn test_config(groq: &MockServer, ollama: &MockServer) -> AiConfig {
    AiConfig {
        default_provider: ProviderKind::Groq,
        fallback_provider: None,
        min_interval: Duration::ZERO,
        max_429_retries: 0,
        groq: GroqConfig {
            api_key: Some("test-key".to_string()),
            base_url: groq.uri(),
            ..GroqConfig::default()
        },
        ollama: OllamaConfig {
            base_url: ollama.uri(),
            ..OllamaConfig::default()
        },
        ..AiConfig::default()
    }
}

/// Spin up the full HTTP surface over the given config.
pub fn test_server(config: AiConfig) -> TestServer {
    let router = ChatRouter::new(config).expect("router construction failed");
    TestServer::new(build_router(AppState::new(router))).expect("test server failed to start")
}
