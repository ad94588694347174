//! Webhook registration, exposed as HTTP routes and used by `paybridge register-webhooks`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core::error::upstream_status;
use crate::core::{AppError, AppResult};
use crate::telegram::register_webhook;
use crate::web::AppState;

#[derive(Debug, Serialize)]
struct SetupStatus {
    status: &'static str,
    message: String,
}

/// Points Telegram at `{PUBLIC_URL}/webhook`.
pub async fn register_telegram(state: &AppState) -> AppResult<()> {
    let token = state
        .config
        .bot_token
        .as_ref()
        .ok_or(AppError::ConfigMissing("Telegram token"))?;
    let webhook_url = state.config.telegram_webhook_url()?;

    register_webhook(
        &state.http,
        &state.config.telegram_api_url,
        token,
        &webhook_url,
        &state.config.retry,
    )
    .await
}

/// Registers `{PUBLIC_URL}/webhook/razorpay` for `payment_captured`; returns the webhook id.
pub async fn register_razorpay(state: &AppState) -> AppResult<String> {
    let secret = state
        .config
        .razorpay_secret
        .as_ref()
        .ok_or(AppError::ConfigMissing("Razorpay secret"))?;
    let webhook_url = state.config.razorpay_webhook_url()?;

    state.razorpay.create_webhook(secret, &webhook_url).await
}

/// GET/POST /setwebhook
pub async fn set_telegram_webhook(State(state): State<Arc<AppState>>) -> Response {
    match register_telegram(&state).await {
        Ok(()) => "Webhook setup ok".into_response(),
        Err(e @ AppError::ConfigMissing(_)) => {
            tracing::error!("{}", e);
            (e.status(), e.to_string()).into_response()
        }
        Err(AppError::Upstream { status, description, .. }) => {
            tracing::error!(status = status.as_u16(), "Telegram webhook setup failed: {}", description);
            (upstream_status(status), format!("Webhook setup failed: {description}")).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// POST /setup-razorpay-webhook
pub async fn setup_razorpay_webhook(State(state): State<Arc<AppState>>) -> Response {
    match register_razorpay(&state).await {
        Ok(_) => status_json(StatusCode::OK, "OK", "Razorpay webhook setup ok".to_owned()),
        Err(e @ AppError::ConfigMissing(_)) => {
            tracing::error!("{}", e);
            status_json(e.status(), "Internal Server Error", e.to_string())
        }
        Err(AppError::Upstream { status, description, .. }) => {
            tracing::error!(status = status.as_u16(), "Razorpay webhook setup failed: {}", description);
            status_json(
                upstream_status(status),
                "Failed",
                format!("Razorpay webhook setup failed: {description}"),
            )
        }
        Err(e) => {
            tracing::error!("Razorpay webhook setup failed: {}", e);
            status_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "Razorpay webhook setup failed".to_owned(),
            )
        }
    }
}

fn status_json(code: StatusCode, status: &'static str, message: String) -> Response {
    (code, Json(SetupStatus { status, message })).into_response()
}
