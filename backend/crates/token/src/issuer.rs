//! Token Issuer
//!
//! Builds and signs session tokens for authenticated accounts.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use crate::claims::{Claims, TokenSubject};
use crate::config::TokenConfig;
use crate::error::TokenError;

/// Issues compact signed session tokens
#[derive(Clone)]
pub struct TokenIssuer {
    config: Arc<TokenConfig>,
}

impl TokenIssuer {
    pub fn new(config: Arc<TokenConfig>) -> Self {
        Self { config }
    }

    /// Issue a token for the given subject.
    ///
    /// Claims are fully determined by the subject and the clock: two
    /// calls with identical input differ only in `iat`/`exp`.
    pub fn issue(&self, subject: &TokenSubject) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: subject.account_id.clone(),
            email: subject.email.clone(),
            roles: subject.role_claims(),
            authorities: subject.authority_claims(),
            iss: self.config.issuer.clone(),
            iat: now,
            exp: now + self.config.lifetime_secs(),
        };

        tracing::debug!(subject = %claims.sub, "Issuing session token");

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.secret()),
        )
        .map_err(|e| TokenError::Issuance(e.to_string()))
    }
}
