//! Account Entity
//!
//! A single account record: credentials, activation state, 2FA state
//! and role membership. Role membership is a set of role IDs; roles and
//! permissions live in their own tables (see [`super::role`]).

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, RoleId};
use platform::one_time_token::IssuedToken;
use platform::password::HashedPassword;

use crate::domain::value_object::{email::Email, totp_secret::TotpSecret};

/// Account entity
#[derive(Debug, Clone)]
pub struct Account {
    /// Internal UUID identifier
    pub account_id: AccountId,
    /// Email address (unique, login identifier)
    pub email: Email,
    /// Argon2id password hash
    pub password_hash: HashedPassword,
    /// TOTP shared secret, generated once at creation
    pub totp_secret: TotpSecret,
    /// Whether 2FA enrollment has been verified at least once
    pub two_factor_enabled: bool,
    /// Whether the activation flow has completed
    pub is_active: bool,
    /// SHA-256 hash of the outstanding activation token, if any
    pub activation_token_hash: Option<[u8; 32]>,
    /// Expiry of the outstanding activation token
    pub activation_token_expires_at: Option<DateTime<Utc>>,
    /// Role membership (IDs into the role table)
    pub roles: BTreeSet<RoleId>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new inactive account.
    ///
    /// The TOTP secret is minted here and stays with the account for its
    /// whole lifetime; enrollment later only flips `two_factor_enabled`.
    pub fn new(email: Email, password_hash: HashedPassword) -> Self {
        let now = Utc::now();
        Self {
            account_id: AccountId::new(),
            email,
            password_hash,
            totp_secret: TotpSecret::generate(),
            two_factor_enabled: false,
            is_active: false,
            activation_token_hash: None,
            activation_token_expires_at: None,
            roles: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach a freshly issued activation token (stores only the hash)
    pub fn set_activation_token(&mut self, token: &IssuedToken) {
        self.activation_token_hash = Some(token.hash);
        self.activation_token_expires_at = Some(token.expires_at);
        self.updated_at = Utc::now();
    }

    /// Whether the outstanding activation token is past its TTL
    pub fn activation_token_expired(&self) -> bool {
        match self.activation_token_expires_at {
            Some(expires_at) => Utc::now() > expires_at,
            None => false,
        }
    }

    /// Activate the account and invalidate the activation token
    pub fn activate(&mut self) {
        self.is_active = true;
        self.activation_token_hash = None;
        self.activation_token_expires_at = None;
        self.updated_at = Utc::now();
    }

    /// Mark first-time 2FA enrollment as verified.
    ///
    /// One-way: there is no operation that flips this back.
    pub fn enable_two_factor(&mut self) {
        self.two_factor_enabled = true;
        self.updated_at = Utc::now();
    }

    /// Add a role to this account
    pub fn grant_role(&mut self, role_id: RoleId) {
        self.roles.insert(role_id);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::one_time_token;
    use platform::password::ClearTextPassword;

    fn account() -> Account {
        let password = ClearTextPassword::new("CorrectHorse42!".to_string()).unwrap();
        Account::new(
            Email::new("a@x.com").unwrap(),
            password.hash(None).unwrap(),
        )
    }

    #[test]
    fn test_new_account_starts_inactive_without_2fa() {
        let account = account();
        assert!(!account.is_active);
        assert!(!account.two_factor_enabled);
        assert!(account.activation_token_hash.is_none());
        assert!(!account.totp_secret.as_base32().is_empty());
    }

    #[test]
    fn test_activation_clears_token() {
        let mut account = account();
        let token = one_time_token::issue_activation();
        account.set_activation_token(&token);
        assert!(account.activation_token_hash.is_some());

        account.activate();
        assert!(account.is_active);
        assert!(account.activation_token_hash.is_none());
        assert!(account.activation_token_expires_at.is_none());
    }

    #[test]
    fn test_expired_activation_token() {
        let mut account = account();
        let mut token = one_time_token::issue_activation();
        token.expires_at = Utc::now() - chrono::Duration::hours(1);
        account.set_activation_token(&token);

        assert!(account.activation_token_expired());
    }

    #[test]
    fn test_grant_role_is_idempotent() {
        let mut account = account();
        let role_id = RoleId::new();
        account.grant_role(role_id);
        account.grant_role(role_id);
        assert_eq!(account.roles.len(), 1);
    }
}
