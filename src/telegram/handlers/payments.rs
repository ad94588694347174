//! Telegram payment flow: pre-checkout answers and the post-payment message.

use backon::Retryable;
use teloxide::prelude::*;
use teloxide::types::PreCheckoutQuery;

use crate::core::retry::{backoff, is_transient_request_error, log_retry};
use crate::core::AppResult;
use crate::telegram::handlers::types::HandlerDeps;
use crate::telegram::messages;

/// Approves the query only for the expected invoice payload.
pub async fn handle_pre_checkout(deps: &HandlerDeps, query: PreCheckoutQuery) -> AppResult<()> {
    let query_id = query.id;
    let payload = query.invoice_payload;

    tracing::info!("Received pre_checkout_query: id={}, payload={}", query_id, payload);

    let approved = payload == messages::EXPECTED_INVOICE_PAYLOAD;
    let error_message = if approved {
        None
    } else {
        tracing::warn!(payload = %payload, "Pre-checkout query rejected: unexpected invoice payload");
        Some(messages::INVALID_PAYLOAD)
    };

    // Telegram cancels the checkout if no answer arrives within 10 seconds
    let (bot, query_id) = (&deps.bot, &query_id);
    let answer = move || async move {
        let mut request = bot.answer_pre_checkout_query(query_id.clone(), approved);
        if let Some(message) = error_message {
            request = request.error_message(message);
        }
        request.await
    };

    answer
        .retry(backoff(&deps.config.retry))
        .when(is_transient_request_error)
        .notify(log_retry::<teloxide::RequestError>("telegram.answer_pre_checkout_query"))
        .await?;

    if approved {
        tracing::info!("Pre-checkout query approved");
    }

    Ok(())
}

pub async fn handle_successful_payment(deps: &HandlerDeps, chat_id: ChatId) -> AppResult<()> {
    tracing::info!(chat_id = chat_id.0, "Received successful_payment message");
    send_full_file_link(deps, chat_id).await
}

/// Sends the full-file link to a chat named in a captured Razorpay payment.
pub async fn relay_full_file_link(deps: &HandlerDeps, chat_id: ChatId, payment_id: &str) -> AppResult<()> {
    tracing::info!(chat_id = chat_id.0, payment_id, "Relaying full file link for captured payment");
    send_full_file_link(deps, chat_id).await
}

async fn send_full_file_link(deps: &HandlerDeps, chat_id: ChatId) -> AppResult<()> {
    match deps.config.full_file_link.as_deref() {
        Some(link) => deps.send_text(chat_id, &messages::payment_received(link)).await,
        None => {
            tracing::warn!(chat_id = chat_id.0, "FULL_FILE_LINK is not set");
            deps.send_text(chat_id, messages::FULL_FILE_NOT_CONFIGURED).await
        }
    }
}
