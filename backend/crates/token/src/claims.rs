//! Token Claims
//!
//! The signed claim set and the normalization rules that build it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Prefix distinguishing role authorities from permission authorities
pub const ROLE_PREFIX: &str = "ROLE_";

/// Claim set embedded in every session token.
///
/// Role and authority claims use `BTreeSet` so serialization order is
/// deterministic and equality is order-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: account id
    pub sub: String,
    /// Account email
    pub email: String,
    /// Role names, `ROLE_`-prefixed and upper-cased
    pub roles: BTreeSet<String>,
    /// Permission names, upper-cased, no prefix
    pub authorities: BTreeSet<String>,
    /// Issuer
    pub iss: String,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// What the authenticated account contributes to a token.
///
/// Raw role/permission names go in; the issuer applies prefixing,
/// upper-casing and deduplication.
#[derive(Debug, Clone)]
pub struct TokenSubject {
    /// Account id (becomes `sub`)
    pub account_id: String,
    /// Account email
    pub email: String,
    /// Raw role names (e.g. `user`, `Admin`)
    pub roles: Vec<String>,
    /// Raw permission names across all roles (e.g. `read`)
    pub permissions: Vec<String>,
}

impl TokenSubject {
    /// Normalized role claim: `ROLE_` + upper-cased name, deduplicated.
    pub fn role_claims(&self) -> BTreeSet<String> {
        self.roles
            .iter()
            .map(|r| format!("{}{}", ROLE_PREFIX, r.to_uppercase()))
            .collect()
    }

    /// Normalized authority claim: upper-cased permission names, deduplicated.
    pub fn authority_claims(&self) -> BTreeSet<String> {
        self.permissions.iter().map(|p| p.to_uppercase()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_claims_prefixed_and_deduplicated() {
        let subject = TokenSubject {
            account_id: "id".to_string(),
            email: "a@x.com".to_string(),
            roles: vec!["admin".to_string(), "ADMIN".to_string(), "user".to_string()],
            permissions: vec![],
        };

        let roles = subject.role_claims();
        assert_eq!(roles.len(), 2);
        assert!(roles.contains("ROLE_ADMIN"));
        assert!(roles.contains("ROLE_USER"));
    }

    #[test]
    fn test_authority_claims_uppercased_and_deduplicated() {
        let subject = TokenSubject {
            account_id: "id".to_string(),
            email: "a@x.com".to_string(),
            roles: vec![],
            permissions: vec!["read".to_string(), "READ".to_string(), "write".to_string()],
        };

        let authorities = subject.authority_claims();
        assert_eq!(authorities.len(), 2);
        assert!(authorities.contains("READ"));
        assert!(authorities.contains("WRITE"));
    }

    #[test]
    fn test_claims_equality_is_order_insensitive() {
        let a: BTreeSet<String> = ["ROLE_ADMIN", "ROLE_USER"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let b: BTreeSet<String> = ["ROLE_USER", "ROLE_ADMIN"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(a, b);
    }
}
