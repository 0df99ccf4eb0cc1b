use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use grperform_core::proxy::ProviderKind;
use serde_json::{json, Value};
use tracing::error;

pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Provider chosen by precedence: request body `provider`, else the default.
pub async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    dispatch(state, None, payload).await
}

pub async fn handle_groq_chat(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    dispatch(state, Some(ProviderKind::Groq), payload).await
}

pub async fn handle_ollama_chat(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    dispatch(state, Some(ProviderKind::Ollama), payload).await
}

pub async fn handle_gemini_chat(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    dispatch(state, Some(ProviderKind::Gemini), payload).await
}

async fn dispatch(
    state: AppState,
    forced: Option<ProviderKind>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(json) => json,
        // Covers both malformed JSON (400) and bodies over the size
        // ceiling (413), before the body is fully buffered.
        Err(rejection) => {
            return (
                rejection.status(),
                Json(json!({"error": format!("Invalid JSON: {}", rejection.body_text())})),
            )
                .into_response();
        }
    };

    // Run the routing on a detached task: axum drops this handler future if
    // the client disconnects, but the spawned upstream call runs to
    // completion, so the throttle accounting and the upstream both see a
    // finished request.
    let router = state.router.clone();
    let outcome = tokio::spawn(async move { router.dispatch(forced, &body).await }).await;

    match outcome {
        Ok(Ok(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(Err(failure)) => {
            let status = StatusCode::from_u16(failure.status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(failure)).into_response()
        }
        Err(join_err) => {
            error!(%join_err, "chat routing task aborted unexpectedly");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Unexpected server error", "details": join_err.to_string()})),
            )
                .into_response()
        }
    }
}
