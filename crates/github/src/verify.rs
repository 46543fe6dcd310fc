//! Webhook signature verification

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

/// Verify the webhook signature from GitHub
///
/// `signature` is the value of the `X-Hub-Signature-256` header,
/// `secret` the shared webhook secret and `body` the raw request body.
/// The digest comparison is constant time.
pub fn verify_signature(signature: &str, secret: &str, body: &[u8]) -> bool {
    // Signature format: "sha256=<hex digest>"
    let signature = match signature.trim().strip_prefix("sha256=") {
        Some(s) => s,
        None => return false,
    };

    let signature_bytes = match hex::decode(signature) {
        Ok(b) => b,
        Err(_) => return false,
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };

    mac.update(body);
    mac.verify_slice(&signature_bytes).is_ok()
}

/// Compute the `sha256=<hex>` signature GitHub would send for `body`
pub fn sign(secret: &str, body: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}
