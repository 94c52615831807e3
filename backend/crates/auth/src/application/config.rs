//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::sync::Arc;

use token::TokenConfig;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Signing configuration shared with the token issuer/validator
    pub token: Arc<TokenConfig>,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl AuthConfig {
    /// Create config around an existing token configuration
    pub fn new(token: Arc<TokenConfig>) -> Self {
        Self {
            token,
            password_pepper: None,
        }
    }

    /// Create config with a random signing secret (for development)
    pub fn development() -> Self {
        Self::new(Arc::new(TokenConfig::with_random_secret()))
    }

    /// Set the password pepper
    pub fn with_pepper(mut self, pepper: Vec<u8>) -> Self {
        self.password_pepper = Some(pepper);
        self
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
