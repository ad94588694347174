//! Integration tests for the liveness and webhook setup routes
//!
//! Run with: cargo test --test setup_routes_test

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_string_contains, header, method, path, path_regex};
use wiremock::{Mock, ResponseTemplate};

use common::{TestApp, PUBLIC_URL, TEST_SECRET};

#[tokio::test]
async fn test_index() {
    let app = TestApp::new().await;

    let (status, text) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Hello World");
}

#[tokio::test]
async fn test_favicon_is_empty() {
    let app = TestApp::new().await;

    let (status, text) = app.get("/favicon.ico").await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(text.is_empty());
}

#[tokio::test]
async fn test_set_telegram_webhook() {
    let app = TestApp::new().await;
    Mock::given(method("POST"))
        .and(path_regex("^/bot[^/]+/setWebhook$"))
        .and(body_string_contains("url=https%3A%2F%2Frelay.example.com%2Fwebhook"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": true,
            "description": "Webhook was set"
        })))
        .expect(2)
        .mount(&app.telegram)
        .await;

    let (status, text) = app.get("/setwebhook").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Webhook setup ok");

    let (status, text) = app.post_empty("/setwebhook").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Webhook setup ok");
}

#[tokio::test]
async fn test_set_telegram_webhook_rejected() {
    let app = TestApp::new().await;
    Mock::given(method("POST"))
        .and(path_regex("^/bot[^/]+/setWebhook$"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "ok": false,
            "error_code": 401,
            "description": "Unauthorized"
        })))
        .mount(&app.telegram)
        .await;

    let (status, text) = app.get("/setwebhook").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(text, "Webhook setup failed: Unauthorized");
}

#[tokio::test]
async fn test_set_telegram_webhook_not_ok_in_200() {
    let app = TestApp::new().await;
    Mock::given(method("POST"))
        .and(path_regex("^/bot[^/]+/setWebhook$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": false})))
        .mount(&app.telegram)
        .await;

    let (status, text) = app.get("/setwebhook").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(text, "Webhook setup failed: Unknown error");
}

#[tokio::test]
async fn test_set_telegram_webhook_without_token() {
    let app = TestApp::with_overrides(json!({"bot_token": ""})).await;

    let (status, text) = app.get("/setwebhook").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(text, "Telegram token is not configured");
    assert_eq!(app.total_telegram_requests().await, 0);
}

#[tokio::test]
async fn test_setup_razorpay_webhook() {
    let app = TestApp::new().await;
    Mock::given(method("POST"))
        .and(path("/v1/webhooks"))
        .and(header("authorization", format!("Basic {TEST_SECRET}").as_str()))
        .and(body_json(json!({
            "url": format!("{PUBLIC_URL}/webhook/razorpay"),
            "event": "payment_captured"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "wh_123", "active": true})))
        .expect(1)
        .mount(&app.razorpay)
        .await;

    let (status, text) = app.post_empty("/setup-razorpay-webhook").await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body, json!({"status": "OK", "message": "Razorpay webhook setup ok"}));
}

#[tokio::test]
async fn test_setup_razorpay_webhook_rejected() {
    let app = TestApp::new().await;
    Mock::given(method("POST"))
        .and(path("/v1/webhooks"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": "BAD_REQUEST_ERROR", "description": "The url is invalid"}
        })))
        .expect(1)
        .mount(&app.razorpay)
        .await;

    let (status, text) = app.post_empty("/setup-razorpay-webhook").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        body,
        json!({"status": "Failed", "message": "Razorpay webhook setup failed: The url is invalid"})
    );
}

#[tokio::test]
async fn test_setup_razorpay_webhook_server_error_is_not_retried() {
    let app = TestApp::new().await;
    Mock::given(method("POST"))
        .and(path("/v1/webhooks"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .expect(1)
        .mount(&app.razorpay)
        .await;

    let (status, text) = app.post_empty("/setup-razorpay-webhook").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["message"], json!("Razorpay webhook setup failed: Unknown error"));
}

#[tokio::test]
async fn test_setup_razorpay_webhook_without_secret() {
    let app = TestApp::with_overrides(json!({"razorpay_secret": ""})).await;

    let (status, text) = app.post_empty("/setup-razorpay-webhook").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        body,
        json!({"status": "Internal Server Error", "message": "Razorpay secret is not configured"})
    );
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new().await;

    let (status, _) = app.get("/admin").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
