//! POST /webhook/razorpay
//!
//! Checks run in a fixed order and the first failure decides the response:
//! secret configured (500), signature header present (401), body is JSON (400),
//! signature matches (401). Only then is the event looked at.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use teloxide::types::ChatId;

use crate::core::{AppError, AppResult};
use crate::payments::event::{parse_body, EventError};
use crate::payments::{verify_signature, CapturedPayment, RazorpayEvent, SIGNATURE_HEADER};
use crate::telegram::handlers::payments::relay_full_file_link;
use crate::web::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    PaymentCaptured { payment_id: String, relayed: bool },
    Ignored { event: Option<String> },
}

pub async fn razorpay_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<&'static str> {
    let secret = state
        .config
        .razorpay_secret
        .as_ref()
        .ok_or(AppError::ConfigMissing("Razorpay secret"))?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Unauthorized("missing Razorpay signature header"))?;

    if body.is_empty() {
        return Err(AppError::MalformedRequest("empty Razorpay payload".into()));
    }
    let payload = parse_body(&body).map_err(|e| AppError::MalformedRequest(format!("invalid Razorpay payload: {e}")))?;

    if !verify_signature(&body, signature, secret) {
        return Err(AppError::Unauthorized("invalid Razorpay signature"));
    }

    let event = RazorpayEvent::from_value(payload).map_err(|e| match e {
        EventError::MissingPaymentId => AppError::MalformedRequest(e.to_string()),
    })?;

    handle_event(&state, event).await;
    Ok("OK")
}

/// Acts on a verified event. Relay failures are logged and never fail the webhook.
pub async fn handle_event(state: &AppState, event: RazorpayEvent) -> WebhookOutcome {
    match event {
        RazorpayEvent::PaymentCaptured(payment) => {
            tracing::info!(payment_id = %payment.id, "Payment captured");
            let relayed = relay(state, &payment).await;
            WebhookOutcome::PaymentCaptured {
                payment_id: payment.id,
                relayed,
            }
        }
        RazorpayEvent::Other(event) => {
            tracing::debug!(event = ?event, "Ignoring Razorpay event");
            WebhookOutcome::Ignored { event }
        }
    }
}

async fn relay(state: &AppState, payment: &CapturedPayment) -> bool {
    let Some(chat_id) = payment.telegram_chat_id else {
        return false;
    };

    let deps = match state.handler_deps() {
        Ok(deps) => deps,
        Err(e) => {
            tracing::warn!(payment_id = %payment.id, "Cannot relay captured payment: {}", e);
            return false;
        }
    };

    match relay_full_file_link(&deps, ChatId(chat_id), &payment.id).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(payment_id = %payment.id, chat_id, "Failed to relay full file link: {}", e);
            false
        }
    }
}
