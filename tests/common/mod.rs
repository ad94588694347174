//! Common test utilities
//!
//! `TestApp` wires the real router to three wiremock servers standing in for the
//! Telegram Bot API, the Razorpay API and the host of the sample file.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use figment::providers::Serialized;
use figment::Figment;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paybridge::core::Config;
use paybridge::payments::signature::compute_signature;
use paybridge::web::{router, AppState};

pub const TEST_TOKEN: &str = "123456:TEST_TOKEN";
pub const TEST_SECRET: &str = "topsecret";
pub const TEST_CHAT_ID: i64 = 123456789;
pub const PAYMENT_LINK: &str = "https://rzp.io/l/full-file";
pub const FULL_FILE_LINK: &str = "https://files.example.com/full.pdf";
pub const PUBLIC_URL: &str = "https://relay.example.com";

pub struct TestApp {
    pub telegram: MockServer,
    pub razorpay: MockServer,
    pub files: MockServer,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_overrides(json!({})).await
    }

    /// `overrides` is merged over the base config. An empty string unsets a key.
    pub async fn with_overrides(overrides: Value) -> Self {
        let telegram = MockServer::start().await;
        let razorpay = MockServer::start().await;
        let files = MockServer::start().await;

        let figment = Figment::new()
            .merge(Serialized::defaults(base_config(&telegram, &razorpay, &files)))
            .merge(Serialized::defaults(overrides));
        let config = Config::from_figment(figment).expect("test config should load");
        let state = Arc::new(AppState::new(config).expect("test state should build"));

        Self {
            telegram,
            razorpay,
            files,
            state,
        }
    }

    pub fn router(&self) -> Router {
        router(Arc::clone(&self.state))
    }

    /// Sends one request through the router and returns status and body text.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router().oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_empty(&self, uri: &str) -> (StatusCode, String) {
        self.send(Request::post(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_update(&self, update: Value) -> (StatusCode, String) {
        self.post_raw_update(update.to_string()).await
    }

    pub async fn post_raw_update(&self, body: impl Into<Body>) -> (StatusCode, String) {
        let request = Request::post("/webhook")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();
        self.send(request).await
    }

    /// Posts `body` to the Razorpay webhook with an optional signature header.
    pub async fn post_razorpay(&self, body: &str, signature: Option<&str>) -> (StatusCode, String) {
        let mut request = Request::post("/webhook/razorpay").header("content-type", "application/json");
        if let Some(signature) = signature {
            request = request.header("X-Razorpay-Signature", signature);
        }
        self.send(request.body(Body::from(body.to_owned())).unwrap()).await
    }

    /// Posts `body` signed with the test secret.
    pub async fn post_signed_razorpay(&self, body: &str) -> (StatusCode, String) {
        let signature = sign(body);
        self.post_razorpay(body, Some(&signature)).await
    }

    /// Mounts a successful answer for any Bot API method.
    pub async fn mock_telegram_ok(&self, api_method: &str, result: Value) {
        Mock::given(method("POST"))
            .and(path_regex(format!("(?i)^/bot[^/]+/{api_method}$")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": result})))
            .mount(&self.telegram)
            .await;
    }

    pub async fn mock_send_message(&self) {
        self.mock_telegram_ok("sendMessage", sent_message_json()).await;
    }

    pub async fn mock_send_document(&self) {
        let mut message = sent_message_json();
        message["document"] = json!({"file_id": "doc-1", "file_unique_id": "doc-u-1"});
        self.mock_telegram_ok("sendDocument", message).await;
    }

    /// JSON bodies of every request made to `api_method`.
    pub async fn telegram_calls(&self, api_method: &str) -> Vec<Value> {
        let suffix = format!("/{api_method}").to_lowercase();
        self.telegram
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path().to_lowercase().ends_with(&suffix))
            .map(|request| serde_json::from_slice(&request.body).unwrap_or(Value::Null))
            .collect()
    }

    /// Number of requests made to `api_method`, whatever their encoding.
    pub async fn telegram_call_count(&self, api_method: &str) -> usize {
        let suffix = format!("/{api_method}").to_lowercase();
        self.telegram
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path().to_lowercase().ends_with(&suffix))
            .count()
    }

    /// Texts of all sent messages, in order.
    pub async fn sent_texts(&self) -> Vec<String> {
        self.telegram_calls("sendMessage")
            .await
            .into_iter()
            .filter_map(|body| body["text"].as_str().map(str::to_owned))
            .collect()
    }

    pub async fn total_telegram_requests(&self) -> usize {
        self.telegram.received_requests().await.unwrap_or_default().len()
    }
}

pub fn base_config(telegram: &MockServer, razorpay: &MockServer, files: &MockServer) -> Value {
    json!({
        "bot_token": TEST_TOKEN,
        "razorpay_secret": TEST_SECRET,
        "sample_file_url": format!("{}/files/sample.pdf", files.uri()),
        "razorpay_payment_link": PAYMENT_LINK,
        "full_file_link": FULL_FILE_LINK,
        "public_url": PUBLIC_URL,
        "telegram_api_url": telegram.uri(),
        "razorpay_api_url": razorpay.uri(),
        "http_timeout_secs": 5,
        "http_connect_timeout_secs": 2,
        "retry_max_times": 1,
        "retry_min_delay_ms": 1,
        "retry_max_delay_ms": 5,
    })
}

pub fn sign(body: &str) -> String {
    compute_signature(body.as_bytes(), TEST_SECRET.as_bytes())
}

/// Minimal Message object as returned by sendMessage
pub fn sent_message_json() -> Value {
    json!({
        "message_id": 42,
        "from": {"id": 987654321, "is_bot": true, "first_name": "TestBot", "username": "test_bot"},
        "chat": {"id": TEST_CHAT_ID, "first_name": "Test", "type": "private"},
        "date": 1735992000,
        "text": "ok"
    })
}

/// A private-chat message update from the test user
pub fn message_update(fields: Value) -> Value {
    let mut message = json!({
        "message_id": 7,
        "date": 1735992000,
        "chat": {"id": TEST_CHAT_ID, "first_name": "Test", "type": "private"},
        "from": {"id": TEST_CHAT_ID, "is_bot": false, "first_name": "Test"}
    });
    if let (Some(message), Some(fields)) = (message.as_object_mut(), fields.as_object()) {
        message.extend(fields.clone());
    }
    json!({"update_id": 1000, "message": message})
}

pub fn command_update(text: &str) -> Value {
    message_update(json!({
        "text": text,
        "entities": [{"type": "bot_command", "offset": 0, "length": text.split_whitespace().next().map_or(0, str::len)}]
    }))
}

pub fn pre_checkout_update(payload: &str) -> Value {
    json!({
        "update_id": 1001,
        "pre_checkout_query": {
            "id": "query-1",
            "from": {"id": TEST_CHAT_ID, "is_bot": false, "first_name": "Test"},
            "currency": "INR",
            "total_amount": 49900,
            "invoice_payload": payload
        }
    })
}

pub fn successful_payment_update() -> Value {
    message_update(json!({
        "successful_payment": {
            "currency": "INR",
            "total_amount": 49900,
            "invoice_payload": "unique-payload",
            "telegram_payment_charge_id": "tg_charge_1",
            "provider_payment_charge_id": "rzp_charge_1"
        }
    }))
}

pub fn captured_payment_body(payment_id: &str, notes: Value) -> String {
    json!({
        "event": "payment_captured",
        "payload": {"payment": {"entity": {"id": payment_id, "notes": notes}}}
    })
    .to_string()
}
