//! Single-use Tokens
//!
//! One-time tokens for flows like account activation. The raw value is
//! handed to the user exactly once (e.g. in an email link); only its
//! SHA-256 hash is persisted, so a leaked database never exposes a
//! usable token.

use chrono::{DateTime, Duration, Utc};

use crate::crypto::{from_base64_url, random_bytes, sha256, to_base64_url};

/// Raw token entropy in bytes
const TOKEN_BYTES: usize = 32;

/// How long an activation token stays valid
pub const ACTIVATION_TOKEN_TTL_HOURS: i64 = 24;

/// A freshly issued one-time token.
///
/// `raw` leaves the process (emailed to the user); `hash` is what gets
/// stored next to the account.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// URL-safe value for the user
    pub raw: String,
    /// SHA-256 of the raw bytes, for storage
    pub hash: [u8; 32],
    /// Expiry timestamp
    pub expires_at: DateTime<Utc>,
}

/// Issue a new one-time token with the given time-to-live.
pub fn issue(ttl: Duration) -> IssuedToken {
    let bytes = random_bytes(TOKEN_BYTES);
    IssuedToken {
        raw: to_base64_url(&bytes),
        hash: sha256(&bytes),
        expires_at: Utc::now() + ttl,
    }
}

/// Issue an activation token with the default 24 h TTL.
pub fn issue_activation() -> IssuedToken {
    issue(Duration::hours(ACTIVATION_TOKEN_TTL_HOURS))
}

/// Hash a raw token as received from a user.
///
/// Returns `None` when the value is not valid URL-safe base64; such
/// tokens can never match a stored hash.
pub fn hash_raw(raw: &str) -> Option<[u8; 32]> {
    let bytes = from_base64_url(raw).ok()?;
    Some(sha256(&bytes))
}
