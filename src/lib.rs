//! Paybridge - relay between a Telegram bot and Razorpay payment webhooks
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, outbound HTTP and retry policy
//! - `payments`: Razorpay signatures, event payloads and the REST client
//! - `telegram`: bot commands, update classification and handlers
//! - `web`: the axum router serving both webhooks and the setup routes

pub mod cli;
pub mod core;
pub mod payments;
pub mod telegram;
pub mod web;

// Re-export commonly used types for convenience
pub use core::{AppError, AppResult, Config};
pub use web::{router, AppState};
