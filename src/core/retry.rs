//! Retry policy for outbound calls.
//!
//! Only failures that say nothing about the request itself are retried: the connection
//! could not be made, the transfer broke off, or the remote side answered 5xx/429.
//! Anything the provider answered deliberately (bad token, rejected webhook) is final.

use std::time::Duration;

use backon::ExponentialBuilder;
use reqwest::StatusCode;
use teloxide::RequestError;

use crate::core::config::RetrySettings;

/// Exponential backoff with jitter, bounded by `settings`.
pub fn backoff(settings: &RetrySettings) -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(settings.min_delay)
        .with_max_delay(settings.max_delay)
        .with_max_times(settings.max_times)
        .with_jitter()
}

/// Telegram calls worth repeating. `RetryAfter` is left out on purpose: the flood wait
/// is usually far longer than our backoff window.
pub fn is_transient_request_error(err: &RequestError) -> bool {
    matches!(err, RequestError::Network(_) | RequestError::Io(_))
}

/// Plain HTTP calls worth repeating (timeouts and refused connections).
pub fn is_transient_http_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

/// The request never reached the server, so repeating it cannot duplicate a side effect.
pub fn is_connect_error(err: &reqwest::Error) -> bool {
    err.is_connect()
}

pub fn is_transient_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// Shared `notify` callback for backon retries.
pub fn log_retry<E: std::fmt::Display>(operation: &'static str) -> impl Fn(&E, Duration) {
    move |err, delay| {
        tracing::warn!(operation, ?delay, "Transient failure, retrying: {}", err);
    }
}
