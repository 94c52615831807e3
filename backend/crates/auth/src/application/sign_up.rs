//! Sign Up Use Case
//!
//! Registers a new inactive account and dispatches the activation token.

use std::sync::Arc;

use platform::one_time_token;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::account::Account;
use crate::domain::entity::role::{DEFAULT_PERMISSION, DEFAULT_ROLE, Permission, Role};
use crate::domain::repository::{AccountRepository, ActivationNotifier, RoleRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    /// Email address
    pub email: String,
    /// Clear text password
    pub password: String,
}

/// Sign up output
pub struct SignUpOutput {
    /// Newly created account ID
    pub account_id: kernel::id::AccountId,
}

/// Sign up use case
pub struct SignUpUseCase<A, R, N>
where
    A: AccountRepository,
    R: RoleRepository,
    N: ActivationNotifier,
{
    account_repo: Arc<A>,
    role_repo: Arc<R>,
    notifier: Arc<N>,
    config: Arc<AuthConfig>,
}

impl<A, R, N> SignUpUseCase<A, R, N>
where
    A: AccountRepository,
    R: RoleRepository,
    N: ActivationNotifier,
{
    pub fn new(
        account_repo: Arc<A>,
        role_repo: Arc<R>,
        notifier: Arc<N>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            account_repo,
            role_repo,
            notifier,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let email = Email::new(input.email)?;

        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        if self.account_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = password
            .hash(self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let mut account = Account::new(email, password_hash);

        // Every account starts with the default role
        let default_role = self.find_or_create_default_role().await?;
        account.grant_role(default_role.role_id);

        // The raw token leaves via the notifier; only its hash is stored
        let activation = one_time_token::issue_activation();
        account.set_activation_token(&activation);

        self.account_repo.create(&account).await?;

        self.notifier
            .send_activation(&account.email, &activation.raw, activation.expires_at)
            .await?;

        tracing::info!(
            account_id = %account.account_id,
            "Account created, activation pending"
        );

        Ok(SignUpOutput {
            account_id: account.account_id,
        })
    }

    async fn find_or_create_default_role(&self) -> AuthResult<Role> {
        if let Some(role) = self.role_repo.find_role_by_name(DEFAULT_ROLE).await? {
            return Ok(role);
        }

        let permission = Permission::new(DEFAULT_PERMISSION);
        self.role_repo.create_permission(&permission).await?;

        let mut role = Role::new(DEFAULT_ROLE);
        role.grant_permission(permission.permission_id);
        self.role_repo.create_role(&role).await?;

        Ok(role)
    }
}
