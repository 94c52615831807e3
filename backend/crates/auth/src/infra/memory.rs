//! In-Memory Repository Implementation
//!
//! Backing store for tests and local development. Indexed the same way
//! the database is: accounts by ID with secondary email and activation
//! hash lookups, roles and permissions in their own tables.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use kernel::id::{AccountId, PermissionId, RoleId};

use crate::domain::entity::account::Account;
use crate::domain::entity::role::{Permission, Role};
use crate::domain::repository::{AccountRepository, RoleRepository};
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

#[derive(Default)]
struct State {
    accounts: HashMap<AccountId, Account>,
    roles: HashMap<RoleId, Role>,
    permissions: HashMap<PermissionId, Permission>,
}

/// In-memory auth repository
#[derive(Default)]
pub struct InMemoryAuthRepository {
    state: Mutex<State>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountRepository for InMemoryAuthRepository {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        let mut state = self.state.lock().unwrap();
        state.accounts.insert(account.account_id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        let state = self.state.lock().unwrap();
        Ok(state.accounts.get(account_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        let state = self.state.lock().unwrap();
        Ok(state.accounts.values().find(|a| &a.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.accounts.values().any(|a| &a.email == email))
    }

    async fn find_by_activation_hash(&self, hash: &[u8; 32]) -> AuthResult<Option<Account>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .accounts
            .values()
            .find(|a| a.activation_token_hash.as_ref() == Some(hash))
            .cloned())
    }

    async fn update(&self, account: &Account) -> AuthResult<()> {
        let mut state = self.state.lock().unwrap();
        state.accounts.insert(account.account_id, account.clone());
        Ok(())
    }
}

impl RoleRepository for InMemoryAuthRepository {
    async fn find_role_by_name(&self, name: &str) -> AuthResult<Option<Role>> {
        let state = self.state.lock().unwrap();
        Ok(state.roles.values().find(|r| r.name == name).cloned())
    }

    async fn create_role(&self, role: &Role) -> AuthResult<()> {
        let mut state = self.state.lock().unwrap();
        state.roles.insert(role.role_id, role.clone());
        Ok(())
    }

    async fn create_permission(&self, permission: &Permission) -> AuthResult<()> {
        let mut state = self.state.lock().unwrap();
        state
            .permissions
            .insert(permission.permission_id, permission.clone());
        Ok(())
    }

    async fn find_roles(&self, ids: &BTreeSet<RoleId>) -> AuthResult<Vec<Role>> {
        let state = self.state.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| state.roles.get(id).cloned())
            .collect())
    }

    async fn find_permissions(&self, ids: &BTreeSet<PermissionId>) -> AuthResult<Vec<Permission>> {
        let state = self.state.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| state.permissions.get(id).cloned())
            .collect())
    }
}
