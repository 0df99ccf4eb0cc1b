use crate::handlers;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use grperform_core::proxy::MAX_BODY_BYTES;
use tower_http::trace::TraceLayer;

/// Build the HTTP surface. Routes registered as POST-only answer other
/// methods with 405 and an `Allow: POST` header via axum's method fallback.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::handle_health))
        // Provider chosen per precedence rules
        .route("/api/ai/chat", post(handlers::handle_chat))
        // Provider-pinned routes
        .route("/api/ai/groq-chat", post(handlers::handle_groq_chat))
        .route("/api/ai/ollama-chat", post(handlers::handle_ollama_chat))
        .route("/api/ai/gemini-chat", post(handlers::handle_gemini_chat))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
