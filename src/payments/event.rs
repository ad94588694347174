//! Razorpay webhook payloads
//!
//! Only the parts this service acts on are modelled. Everything else in the payload
//! is accepted and ignored, so new fields on Razorpay's side never break parsing.

use serde::Deserialize;
use serde_json::Value;

pub const PAYMENT_CAPTURED: &str = "payment_captured";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RazorpayEvent {
    PaymentCaptured(CapturedPayment),
    /// Any other event name; `None` when the payload has no `event` field
    Other(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPayment {
    pub id: String,
    /// `notes.telegram_chat_id`, when the payment link was created with one
    pub telegram_chat_id: Option<i64>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EventError {
    #[error("payment_captured event without a payment id")]
    MissingPaymentId,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    event: Option<String>,
    #[serde(default)]
    payload: Value,
}

/// Parses a raw webhook body. JSON errors are returned as-is so the caller can
/// answer 400.
pub fn parse_body(body: &[u8]) -> Result<Value, serde_json::Error> {
    serde_json::from_slice(body)
}

impl RazorpayEvent {
    /// Classifies an already parsed payload.
    pub fn from_value(value: Value) -> Result<Self, EventError> {
        let envelope: Envelope = match serde_json::from_value(value) {
            Ok(envelope) => envelope,
            // Valid JSON, but not an object with a string `event`
            Err(_) => return Ok(RazorpayEvent::Other(None)),
        };

        if envelope.event.as_deref() != Some(PAYMENT_CAPTURED) {
            return Ok(RazorpayEvent::Other(envelope.event));
        }

        let entity = &envelope.payload["payment"]["entity"];
        let id = entity["id"]
            .as_str()
            .filter(|id| !id.is_empty())
            .ok_or(EventError::MissingPaymentId)?;

        Ok(RazorpayEvent::PaymentCaptured(CapturedPayment {
            id: id.to_owned(),
            telegram_chat_id: chat_id_from_notes(&entity["notes"]),
        }))
    }
}

/// Razorpay sends `notes` as `[]` when empty and as an object of strings otherwise.
fn chat_id_from_notes(notes: &Value) -> Option<i64> {
    match notes.get("telegram_chat_id")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
