//! Downloads the sample file that `/sample` forwards to the user.

use backon::Retryable;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

use crate::core::config::RetrySettings;
use crate::core::retry::{backoff, is_transient_http_error, is_transient_status, log_retry};

const DEFAULT_FILE_NAME: &str = "sample";

/// Bot API limit for documents uploaded by bots
pub const MAX_SAMPLE_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("sample host answered {0}")]
    Status(StatusCode),

    #[error("sample file exceeds {0} bytes")]
    TooLarge(u64),

    #[error("sample download failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl SampleError {
    fn is_transient(&self) -> bool {
        match self {
            SampleError::Status(status) => is_transient_status(*status),
            SampleError::TooLarge(_) => false,
            SampleError::Http(err) => is_transient_http_error(err),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SampleFile {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

/// GETs `url`, retrying timeouts, connection failures and 5xx/429 answers.
/// Files larger than [`MAX_SAMPLE_BYTES`] are refused without retrying.
pub async fn fetch_sample(http: &Client, url: &Url, retry: &RetrySettings) -> Result<SampleFile, SampleError> {
    fetch_sample_limited(http, url, retry, MAX_SAMPLE_BYTES).await
}

async fn fetch_sample_limited(
    http: &Client,
    url: &Url,
    retry: &RetrySettings,
    limit: u64,
) -> Result<SampleFile, SampleError> {
    let bytes = (move || download(http, url, limit))
        .retry(backoff(retry))
        .when(SampleError::is_transient)
        .notify(log_retry::<SampleError>("sample.fetch"))
        .await?;

    tracing::debug!(size = bytes.len(), url = %url, "Sample file downloaded");

    Ok(SampleFile {
        bytes,
        file_name: file_name_from_url(url),
    })
}

/// Reads the body chunk by chunk so an oversized file is cut off before it is buffered.
async fn download(http: &Client, url: &Url, limit: u64) -> Result<Vec<u8>, SampleError> {
    let mut response = http.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SampleError::Status(status));
    }
    if response.content_length().is_some_and(|len| len > limit) {
        return Err(SampleError::TooLarge(limit));
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if (bytes.len() + chunk.len()) as u64 > limit {
            return Err(SampleError::TooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Last non-empty path segment, so the document keeps its extension in the chat.
pub fn file_name_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(str::to_owned)
        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_owned())
}
