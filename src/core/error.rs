use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Centralized error type for request handling
///
/// Every route handler returns [`AppResult`], and the [`IntoResponse`] impl decides
/// the status code and the body the caller sees. Internal details only go to the log.
#[derive(Error, Debug)]
pub enum AppError {
    /// A setting the operation depends on is unset or empty
    #[error("{0} is not configured")]
    ConfigMissing(&'static str),

    /// The inbound request could not be understood
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Signature header missing or not matching the body
    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),

    /// A provider API answered, but refused the call
    #[error("{provider} rejected the request ({status}): {description}")]
    Upstream {
        provider: &'static str,
        status: StatusCode,
        description: String,
    },

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// HTTP/Fetch errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ConfigMissing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Upstream { status, .. } => upstream_status(*status),
            AppError::Telegram(_)
            | AppError::Http(_)
            | AppError::Url(_)
            | AppError::InvalidHeader(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The provider's status, except that a refusal wrapped in 2xx becomes 502.
pub fn upstream_status(status: StatusCode) -> StatusCode {
    if status.is_success() {
        StatusCode::BAD_GATEWAY
    } else {
        status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Unauthorized(_) | AppError::MalformedRequest(_) => {
                tracing::warn!(status = status.as_u16(), "Rejected request: {}", self);
            }
            _ => tracing::error!(status = status.as_u16(), "Request failed: {}", self),
        }

        let body = status.canonical_reason().unwrap_or("Error");
        (status, body).into_response()
    }
}
