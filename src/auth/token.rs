//! Bearer token inspection
//!
//! Tokens issued by the registry are JWTs. Nothing here verifies signatures;
//! the payload is only read to report expiry.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Decode a JWT payload segment into JSON.
fn decode_payload(token: &str) -> Option<Value> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// True when the token has three segments and a JSON payload.
pub fn is_valid_jwt(token: &str) -> bool {
    decode_payload(token).is_some()
}

/// Expiry time from the payload `exp` claim, if any.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let exp = decode_payload(token)?.get("exp")?.as_i64()?;
    DateTime::from_timestamp(exp, 0)
}

/// Whether the token is expired at `now`.
///
/// Undecodable tokens count as expired; tokens without `exp` never expire.
pub fn is_token_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    match decode_payload(token) {
        None => true,
        Some(payload) => match payload.get("exp").and_then(Value::as_i64) {
            None => false,
            Some(exp) => DateTime::from_timestamp(exp, 0).is_none_or(|expires| expires < now),
        },
    }
}

pub fn is_token_expired(token: &str) -> bool {
    is_token_expired_at(token, Utc::now())
}

/// Short preview safe for logs and status output.
pub fn mask_token(token: &str) -> String {
    let preview: String = token.chars().take(10).collect();
    format!("{}...", preview)
}
