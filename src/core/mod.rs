//! Cross-cutting infrastructure: configuration, errors, logging, outbound HTTP.

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod retry;

pub use config::Config;
pub use error::{AppError, AppResult};
