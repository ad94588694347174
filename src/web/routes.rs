use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use teloxide::types::Update;

use crate::core::{AppError, AppResult};
use crate::telegram::{dispatch, BotEvent};
use crate::web::AppState;

/// Liveness check
pub async fn index() -> &'static str {
    "Hello World"
}

pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// POST /webhook - one Telegram update per request
pub async fn telegram_webhook(State(state): State<Arc<AppState>>, body: Bytes) -> AppResult<&'static str> {
    if body.is_empty() {
        return Err(AppError::MalformedRequest("empty Telegram update".into()));
    }

    let update: Update = serde_json::from_slice(&body)
        .map_err(|e| AppError::MalformedRequest(format!("invalid Telegram update: {e}")))?;

    let deps = state.handler_deps()?;
    let update_id = update.id.0;
    let event = BotEvent::from_update(update, state.config.bot_username.as_deref());

    tracing::debug!(update_id, ?event, "Received Telegram update");
    dispatch(&deps, event).await?;

    Ok("OK")
}
