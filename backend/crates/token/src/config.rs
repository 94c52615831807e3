//! Token Configuration
//!
//! Shared settings for the issuer and every validating party. The same
//! secret signs at the auth server and verifies at the gateway.

use std::time::Duration;

use crate::error::TokenError;

/// Minimum HS256 secret length in bytes
pub const MIN_SECRET_BYTES: usize = 32;

/// Fixed token lifetime (1 hour)
pub const TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Default issuer claim value
pub const DEFAULT_ISSUER: &str = "gatehouse-auth";

/// Token signing/validation configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC-SHA256 signing secret (at least [`MIN_SECRET_BYTES`])
    secret: Vec<u8>,
    /// `iss` claim value
    pub issuer: String,
    /// Token lifetime
    pub lifetime: Duration,
}

impl TokenConfig {
    /// Create a config, rejecting secrets under 32 bytes.
    ///
    /// A short secret is a fatal configuration error: callers are
    /// expected to abort startup, not retry.
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, TokenError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_BYTES {
            return Err(TokenError::SecretTooShort {
                min: MIN_SECRET_BYTES,
                actual: secret.len(),
            });
        }

        Ok(Self {
            secret,
            issuer: DEFAULT_ISSUER.to_string(),
            lifetime: TOKEN_LIFETIME,
        })
    }

    /// Create a config with a random secret (for development and tests)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = vec![0u8; MIN_SECRET_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut secret);
        Self {
            secret,
            issuer: DEFAULT_ISSUER.to_string(),
            lifetime: TOKEN_LIFETIME,
        }
    }

    /// Override the issuer claim value
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Signing secret bytes
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// Token lifetime in whole seconds
    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime.as_secs() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_too_short_is_rejected() {
        let result = TokenConfig::new(vec![0u8; MIN_SECRET_BYTES - 1]);
        assert!(matches!(
            result,
            Err(TokenError::SecretTooShort { min: 32, actual: 31 })
        ));
    }

    #[test]
    fn test_minimum_secret_is_accepted() {
        assert!(TokenConfig::new(vec![0u8; MIN_SECRET_BYTES]).is_ok());
        assert!(TokenConfig::new(vec![0u8; 64]).is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = TokenConfig::with_random_secret();
        assert_eq!(config.issuer, DEFAULT_ISSUER);
        assert_eq!(config.lifetime_secs(), 3600);
        assert_eq!(config.secret().len(), MIN_SECRET_BYTES);
    }

    #[test]
    fn test_with_issuer() {
        let config = TokenConfig::with_random_secret().with_issuer("other");
        assert_eq!(config.issuer, "other");
    }
}
