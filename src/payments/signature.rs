//! Razorpay webhook signature verification
//!
//! Razorpay signs every webhook with HMAC-SHA256 over the raw request body, keyed by
//! the webhook secret, and sends the lowercase hex digest in `X-Razorpay-Signature`.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-razorpay-signature";

/// Hex length of a SHA-256 digest
const SIGNATURE_HEX_LEN: usize = 64;

/// Checks `signature` against the HMAC of `body`.
///
/// Returns `false` for an empty secret, a signature that is not 64 lowercase hex
/// characters, or a mismatch. The digest comparison is constant-time.
pub fn verify_signature(body: &[u8], signature: &str, secret: &SecretString) -> bool {
    verify_signature_with_key(body, signature, secret.expose_secret().as_bytes())
}

pub fn verify_signature_with_key(body: &[u8], signature: &str, key: &[u8]) -> bool {
    if key.is_empty() || !is_canonical_hex(signature) {
        return false;
    }

    let Ok(expected) = hex::decode(signature) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(key) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Lowercase hex digest of `body`, as Razorpay would send it.
pub fn compute_signature(body: &[u8], key: &[u8]) -> String {
    #[allow(clippy::expect_used)]
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Uppercase digits decode to the same bytes, so they are rejected here to keep the
/// header byte-exact.
fn is_canonical_hex(signature: &str) -> bool {
    signature.len() == SIGNATURE_HEX_LEN && signature.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
