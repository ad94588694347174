//! Handler dependencies and the shared send helpers

use std::sync::Arc;

use backon::Retryable;
use teloxide::prelude::*;
use teloxide::types::InputFile;

use crate::core::retry::{backoff, is_transient_request_error, log_retry};
use crate::core::{AppResult, Config};

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub bot: Bot,
    /// Client for non-Telegram downloads (the sample file)
    pub http: reqwest::Client,
    pub config: Arc<Config>,
}

impl HandlerDeps {
    pub fn new(bot: Bot, http: reqwest::Client, config: Arc<Config>) -> Self {
        Self { bot, http, config }
    }

    /// Sends a plain text message, retrying network failures.
    pub async fn send_text(&self, chat_id: ChatId, text: &str) -> AppResult<()> {
        let bot = &self.bot;
        let send = move || async move { bot.send_message(chat_id, text).await };

        send.retry(backoff(&self.config.retry))
            .when(is_transient_request_error)
            .notify(log_retry::<teloxide::RequestError>("telegram.send_message"))
            .await?;

        Ok(())
    }

    /// Uploads `bytes` as a document named `file_name`.
    pub async fn send_document(&self, chat_id: ChatId, bytes: Vec<u8>, file_name: &str) -> AppResult<()> {
        let document = InputFile::memory(bytes).file_name(file_name.to_owned());
        let (bot, document) = (&self.bot, &document);
        let send = move || async move { bot.send_document(chat_id, document.clone()).await };

        send.retry(backoff(&self.config.retry))
            .when(is_transient_request_error)
            .notify(log_retry::<teloxide::RequestError>("telegram.send_document"))
            .await?;

        Ok(())
    }
}
