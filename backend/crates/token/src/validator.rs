//! Token Validator
//!
//! Verifies signature and expiry, then extracts a validated [`Identity`].
//! Validation is a pure function of the token and the clock: it never
//! touches process-wide state, and callers thread the returned identity
//! through their own request context.

use std::collections::BTreeSet;
use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crate::claims::{Claims, ROLE_PREFIX};
use crate::config::TokenConfig;
use crate::error::TokenError;

/// Identity extracted from a validated token.
///
/// Authorities are classified by prefix: `ROLE_*` entries are roles,
/// everything else is a permission, regardless of which claim group
/// they arrived in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Account id (`sub` claim)
    pub subject: String,
    /// Account email
    pub email: String,
    /// `ROLE_`-prefixed role names
    pub roles: BTreeSet<String>,
    /// Permission names (no prefix)
    pub permissions: BTreeSet<String>,
}

impl Identity {
    /// Build an identity from a verified claim set.
    pub fn from_claims(claims: Claims) -> Self {
        let mut roles = BTreeSet::new();
        let mut permissions = BTreeSet::new();

        for authority in claims.roles.into_iter().chain(claims.authorities) {
            if authority.starts_with(ROLE_PREFIX) {
                roles.insert(authority);
            } else {
                permissions.insert(authority);
            }
        }

        Self {
            subject: claims.sub,
            email: claims.email,
            roles,
            permissions,
        }
    }
}

/// Validates session tokens against the shared secret
#[derive(Clone)]
pub struct TokenValidator {
    config: Arc<TokenConfig>,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(config: Arc<TokenConfig>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: an expired token fails no matter how recent
        validation.leeway = 0;
        Self { config, validation }
    }

    /// Validate a compact token string.
    ///
    /// Returns an error value for malformed tokens, bad signatures and
    /// expired tokens; callers decide whether that means 401 or
    /// pass-through.
    pub fn validate(&self, token: &str) -> Result<Identity, TokenError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.secret()),
            &self.validation,
        )?;

        Ok(Identity::from_claims(data.claims))
    }
}
