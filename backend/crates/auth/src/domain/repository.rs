//! Repository Traits
//!
//! Ports for data persistence and outbound notification. Implementations
//! live in the infrastructure layer; the application layer only sees
//! these traits.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, PermissionId, RoleId};

use crate::domain::entity::{account::Account, role::Permission, role::Role};
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Create a new account
    async fn create(&self, account: &Account) -> AuthResult<()>;

    /// Find account by ID
    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>>;

    /// Find account by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>>;

    /// Check if email is already registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Find account by the hash of an outstanding activation token
    async fn find_by_activation_hash(&self, hash: &[u8; 32]) -> AuthResult<Option<Account>>;

    /// Update account
    async fn update(&self, account: &Account) -> AuthResult<()>;
}

/// Role/permission table trait
#[trait_variant::make(RoleRepository: Send)]
pub trait LocalRoleRepository {
    /// Find a role by its (upper-case) name
    async fn find_role_by_name(&self, name: &str) -> AuthResult<Option<Role>>;

    /// Insert a role
    async fn create_role(&self, role: &Role) -> AuthResult<()>;

    /// Insert a permission
    async fn create_permission(&self, permission: &Permission) -> AuthResult<()>;

    /// Load roles by ID set
    async fn find_roles(&self, ids: &BTreeSet<RoleId>) -> AuthResult<Vec<Role>>;

    /// Load permissions by ID set
    async fn find_permissions(&self, ids: &BTreeSet<PermissionId>) -> AuthResult<Vec<Permission>>;
}

/// Outbound notification port.
///
/// The real transport (email dispatch) is an external collaborator; the
/// auth core only hands over the raw activation token and never stores it.
#[trait_variant::make(ActivationNotifier: Send)]
pub trait LocalActivationNotifier {
    /// Deliver the raw activation token to the account holder
    async fn send_activation(
        &self,
        email: &Email,
        raw_token: &str,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<()>;

    /// Deliver the post-activation welcome message
    async fn send_welcome(&self, email: &Email) -> AuthResult<()>;
}
