use crate::error::RelayError;
use crate::models::{ChatMessage, ChatRequest, ChatSuccess, GenerationRequest};
use crate::services::{metrics, prompt};
use crate::AppState;
use axum::{extract::State, Json};
use std::time::Instant;

/// The relay handler: probes the upstream, builds the prompt, forwards it,
/// and returns the reply merged into the history.
///
/// The body is parsed by hand so a malformed payload maps onto the same
/// `{ success: false, error }` shape as every other failure instead of the
/// framework's default rejection.
pub async fn chat_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ChatSuccess>, RelayError> {
    tracing::info!(region = %state.region, body_len = body.len(), "Relay request received");

    match relay(&state, &body).await {
        Ok(success) => {
            metrics::record_outcome("success");
            Ok(Json(success))
        }
        Err(e) => {
            metrics::record_outcome("failure");
            tracing::error!(error = %e, "Relay request failed");
            Err(e)
        }
    }
}

async fn relay(state: &AppState, body: &str) -> Result<ChatSuccess, RelayError> {
    // Diagnostic probe only: bounded by its own short timeout, outcome
    // logged and swallowed. A failing probe never gates the generate call.
    match state.generation.health_check().await {
        Ok(()) => tracing::debug!("Upstream health probe ok"),
        Err(e) => tracing::warn!(error = %e, "Upstream health probe failed"),
    }

    let request: ChatRequest = serde_json::from_str(body)
        .map_err(|e| RelayError::Input(format!("invalid request body: {e}")))?;

    let prompt_text = prompt::build_prompt(&request.conversation_history, &request.message);
    let generation = GenerationRequest::new(prompt_text);

    let start = Instant::now();
    let result = state.generation.generate(&generation).await;
    metrics::observe_upstream("generate", start.elapsed().as_secs_f64());
    let result = result?;

    tracing::info!(
        upstream_secs = result.response_time.unwrap_or_default(),
        total_secs = start.elapsed().as_secs_f64(),
        "Upstream generation completed"
    );

    let mut history = request.conversation_history;
    history.push(ChatMessage::assistant(result.generated_text.clone()));

    Ok(ChatSuccess {
        success: true,
        response: result.generated_text,
        conversation_history: history,
    })
}
