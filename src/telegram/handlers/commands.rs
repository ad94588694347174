//! `/start`, `/sample` and `/buy`

use teloxide::types::ChatId;

use crate::core::AppResult;
use crate::telegram::handlers::types::HandlerDeps;
use crate::telegram::messages;
use crate::telegram::sample::fetch_sample;

pub async fn handle_start(deps: &HandlerDeps, chat_id: ChatId) -> AppResult<()> {
    deps.send_text(chat_id, messages::WELCOME).await
}

/// Forwards the sample file. Download failures are reported to the user, not to
/// Telegram's webhook caller.
pub async fn handle_sample(deps: &HandlerDeps, chat_id: ChatId) -> AppResult<()> {
    let Some(url) = &deps.config.sample_file_url else {
        tracing::warn!(chat_id = chat_id.0, "/sample requested but SAMPLE_FILE_URL is not set");
        return deps.send_text(chat_id, messages::SAMPLE_NOT_CONFIGURED).await;
    };

    match fetch_sample(&deps.http, url, &deps.config.retry).await {
        Ok(sample) => {
            tracing::info!(chat_id = chat_id.0, file = %sample.file_name, "Sending sample file");
            deps.send_document(chat_id, sample.bytes, &sample.file_name).await
        }
        Err(e) => {
            tracing::error!(chat_id = chat_id.0, "Failed to fetch sample file: {}", e);
            deps.send_text(chat_id, messages::SAMPLE_FETCH_FAILED).await
        }
    }
}

pub async fn handle_buy(deps: &HandlerDeps, chat_id: ChatId) -> AppResult<()> {
    match deps.config.payment_link.as_deref() {
        Some(link) => deps.send_text(chat_id, &messages::payment_link(link)).await,
        None => {
            tracing::warn!(chat_id = chat_id.0, "/buy requested but RAZORPAY_PAYMENT_LINK is not set");
            deps.send_text(chat_id, messages::PAYMENT_LINK_NOT_CONFIGURED).await
        }
    }
}
