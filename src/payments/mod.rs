//! Razorpay integration: webhook signatures, event payloads and the REST client.

pub mod client;
pub mod event;
pub mod signature;

pub use client::RazorpayClient;
pub use event::{CapturedPayment, RazorpayEvent};
pub use signature::{verify_signature, SIGNATURE_HEADER};
