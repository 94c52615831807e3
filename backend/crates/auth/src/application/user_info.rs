//! User Info Use Case
//!
//! Resolves the account behind a validated token identity.

use std::sync::Arc;

use token::Identity;

use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::error::{AuthError, AuthResult};

/// User info use case
pub struct UserInfoUseCase<A>
where
    A: AccountRepository,
{
    account_repo: Arc<A>,
}

impl<A> UserInfoUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(account_repo: Arc<A>) -> Self {
        Self { account_repo }
    }

    pub async fn execute(&self, identity: &Identity) -> AuthResult<Account> {
        let account_id = identity
            .subject
            .parse()
            .map_err(|_| AuthError::AccountNotFound)?;

        self.account_repo
            .find_by_id(&account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)
    }
}
