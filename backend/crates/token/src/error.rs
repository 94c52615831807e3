//! Token Error Types

use thiserror::Error;

/// Errors from token configuration, issuance and validation
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing secret shorter than the HS256 minimum.
    /// This is a startup configuration error, not a per-request one.
    #[error("Signing secret must be at least {min} bytes (got {actual})")]
    SecretTooShort { min: usize, actual: usize },

    /// Token could not be parsed as a compact JWT
    #[error("Malformed token")]
    Malformed,

    /// Signature does not match the shared secret
    #[error("Invalid token signature")]
    SignatureInvalid,

    /// Token expiry is in the past
    #[error("Token has expired")]
    Expired,

    /// Signing failed (should not happen with a valid config)
    #[error("Token issuance failed: {0}")]
    Issuance(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
            _ => TokenError::Malformed,
        }
    }
}
