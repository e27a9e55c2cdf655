//! Webhook signature helpers.
//!
//! The ingestion gateway authenticates provider deliveries with an
//! HMAC-SHA256 signature over the raw request body, hex encoded in the
//! `x-provider-signature` header. This module lives in `core` so both the
//! gateway and test code can sign payloads the same way.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the HMAC-SHA256 signature of a raw webhook body.
///
/// Returns the hex-encoded signature string as the provider sends it.
pub fn compute_webhook_hmac(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a provider-supplied signature against the raw request body.
///
/// The comparison runs inside the MAC verification, which is constant
/// time. Malformed hex fails verification rather than erroring.
pub fn verify_webhook_signature(secret: &str, payload: &[u8], signature: &str) -> bool {
    let Some(expected) = hex::decode(signature) else {
        return false;
    };
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

// ---------------------------------------------------------------------------
// hex codec helper (no extra dep)
// ---------------------------------------------------------------------------

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a hex string. Returns `None` on odd length or non-hex input.
    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if !s.is_ascii() || s.len() % 2 != 0 {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
            .collect()
    }
}
