use std::time::Duration;

use axum::extract::State;
use axum::Json;
use route_companion::{AnthropicClient, ChatReply, ChatRequest, CompanionError, CompletionClient};
use route_core::context;

use super::with_store;
use crate::error::AppError;
use crate::state::AppState;

/// POST /api/chat: forward the conversation to the completion API.
///
/// An empty `context` is filled from the workspace. Stateless: the caller
/// owns the transcript.
pub async fn chat(
    State(app): State<AppState>,
    Json(mut request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let last_is_blank = request
        .messages
        .last()
        .map_or(true, |m| m.content.trim().is_empty());
    if last_is_blank {
        return Err(CompanionError::EmptyMessage.into());
    }

    let cfg = &app.config.companion;
    let key = app
        .companion_key
        .clone()
        .ok_or_else(|| CompanionError::MissingApiKey(cfg.api_key_env.clone()))?;

    if request.context.is_empty() {
        request.context = with_store(&app, context::build).await?;
    }

    let client = AnthropicClient::with_http(app.http.clone(), cfg, key);
    let timeout = Duration::from_secs(cfg.timeout_secs);
    let text = tokio::time::timeout(timeout, client.complete(&request))
        .await
        .map_err(|_| {
            AppError::upstream(format!("completion timed out after {}s", cfg.timeout_secs))
        })??;
    tracing::debug!(turns = request.messages.len(), chars = text.len(), "companion replied");
    Ok(Json(ChatReply { text }))
}
