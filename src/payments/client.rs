use backon::Retryable;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::core::config::RetrySettings;
use crate::core::http::api_endpoint;
use crate::core::retry::{backoff, is_connect_error, log_retry};
use crate::core::{AppError, AppResult};
use crate::payments::event::PAYMENT_CAPTURED;

const PROVIDER: &str = "Razorpay";

#[derive(Debug, Serialize)]
struct CreateWebhook<'a> {
    url: &'a str,
    event: &'a str,
}

/// Thin client for the Razorpay REST API.
#[derive(Debug, Clone)]
pub struct RazorpayClient {
    http: Client,
    api_url: Url,
    retry: RetrySettings,
}

impl RazorpayClient {
    pub fn new(http: Client, api_url: Url, retry: RetrySettings) -> Self {
        Self { http, api_url, retry }
    }

    /// Registers `webhook_url` for `payment_captured` events and returns the new
    /// webhook id.
    ///
    /// Only connection failures are retried; once the request has reached Razorpay a
    /// second attempt could create a duplicate webhook.
    pub async fn create_webhook(&self, secret: &SecretString, webhook_url: &Url) -> AppResult<String> {
        let endpoint = api_endpoint(&self.api_url, "v1/webhooks")?;

        let mut authorization = HeaderValue::from_str(&format!("Basic {}", secret.expose_secret()))?;
        authorization.set_sensitive(true);

        let body = CreateWebhook {
            url: webhook_url.as_str(),
            event: PAYMENT_CAPTURED,
        };

        let (http, endpoint, authorization, body) = (&self.http, &endpoint, &authorization, &body);
        let send = move || async move {
            http.post(endpoint.clone())
                .header(AUTHORIZATION, authorization.clone())
                .json(body)
                .send()
                .await
        };

        let response = send
            .retry(backoff(&self.retry))
            .when(is_connect_error)
            .notify(log_retry::<reqwest::Error>("razorpay.create_webhook"))
            .await?;

        let status = response.status();
        // Non-JSON bodies (proxies, HTML error pages) are treated as an empty object.
        let payload: Value = response.json().await.unwrap_or(Value::Null);

        if status == StatusCode::OK {
            if let Some(id) = payload["id"].as_str().filter(|id| !id.is_empty()) {
                tracing::info!(webhook_id = id, url = %webhook_url, "Razorpay webhook registered");
                return Ok(id.to_owned());
            }
        }

        let description = payload["error"]["description"]
            .as_str()
            .unwrap_or("Unknown error")
            .to_owned();

        Err(AppError::Upstream {
            provider: PROVIDER,
            status,
            description,
        })
    }
}
