//! Telegram webhook registration
//!
//! Goes through plain `reqwest` instead of the teloxide request builder so the
//! provider's HTTP status can be passed back to the caller of `/setwebhook`.

use backon::Retryable;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use crate::core::config::RetrySettings;
use crate::core::http::api_endpoint;
use crate::core::retry::{backoff, is_transient_http_error, log_retry};
use crate::core::{AppError, AppResult};

const PROVIDER: &str = "Telegram";

/// Points the bot's webhook at `webhook_url`. Succeeds on HTTP 200 with `"ok": true`.
pub async fn register_webhook(
    http: &Client,
    api_url: &Url,
    token: &SecretString,
    webhook_url: &Url,
    retry: &RetrySettings,
) -> AppResult<()> {
    let endpoint = api_endpoint(api_url, &format!("bot{}/setWebhook", token.expose_secret()))?;
    let form = [("url", webhook_url.as_str())];

    let (endpoint, form) = (&endpoint, &form);
    let send = move || async move { http.post(endpoint.clone()).form(form).send().await };

    // setWebhook is idempotent, so timeouts are safe to repeat as well.
    let response = send
        .retry(backoff(retry))
        .when(is_transient_http_error)
        .notify(log_retry::<reqwest::Error>("telegram.set_webhook"))
        .await
        // The token is part of the URL reqwest reports; drop it from the error.
        .map_err(reqwest::Error::without_url)?;

    let status = response.status();
    let payload: Value = response.json().await.unwrap_or(Value::Null);

    if status == StatusCode::OK && payload["ok"].as_bool() == Some(true) {
        tracing::info!(url = %webhook_url, "Telegram webhook registered");
        return Ok(());
    }

    Err(AppError::Upstream {
        provider: PROVIDER,
        status,
        description: payload["description"].as_str().unwrap_or("Unknown error").to_owned(),
    })
}
