//! Activate Account Use Case
//!
//! Redeems a one-time activation token. The token is looked up by its
//! SHA-256 hash and invalidated on success.

use std::sync::Arc;

use platform::one_time_token;

use crate::domain::repository::{AccountRepository, ActivationNotifier};
use crate::error::{AuthError, AuthResult};

/// Activate account use case
pub struct ActivateAccountUseCase<A, N>
where
    A: AccountRepository,
    N: ActivationNotifier,
{
    account_repo: Arc<A>,
    notifier: Arc<N>,
}

impl<A, N> ActivateAccountUseCase<A, N>
where
    A: AccountRepository,
    N: ActivationNotifier,
{
    pub fn new(account_repo: Arc<A>, notifier: Arc<N>) -> Self {
        Self {
            account_repo,
            notifier,
        }
    }

    pub async fn execute(&self, raw_token: &str) -> AuthResult<()> {
        let hash = one_time_token::hash_raw(raw_token).ok_or(AuthError::ActivationTokenInvalid)?;

        let mut account = self
            .account_repo
            .find_by_activation_hash(&hash)
            .await?
            .ok_or(AuthError::ActivationTokenInvalid)?;

        // Activation clears the hash, so a hit on an active account means
        // inconsistent state rather than token reuse
        if account.is_active {
            return Err(AuthError::AlreadyActivated);
        }

        if account.activation_token_expired() {
            return Err(AuthError::ActivationTokenExpired);
        }

        account.activate();
        self.account_repo.update(&account).await?;

        self.notifier.send_welcome(&account.email).await?;

        tracing::info!(account_id = %account.account_id, "Account activated");

        Ok(())
    }
}
