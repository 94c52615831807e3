//! Verify Two-Factor Use Case
//!
//! Second step of the two-phase login. Checks the TOTP code, marks
//! enrollment verified on first success, resolves role and permission
//! names, and issues the signed session token.

use std::collections::BTreeSet;
use std::sync::Arc;

use kernel::id::AccountId;
use token::{TokenIssuer, TokenSubject};

use crate::application::config::AuthConfig;
use crate::domain::repository::{AccountRepository, RoleRepository};
use crate::error::{AuthError, AuthResult};

/// Verify two-factor input
pub struct VerifyTwoFactorInput {
    /// Account being authenticated
    pub account_id: AccountId,
    /// Six-digit TOTP code
    pub code: String,
}

/// Verify two-factor output
pub struct VerifyTwoFactorOutput {
    /// Signed session token
    pub token: String,
}

/// Verify two-factor use case
pub struct VerifyTwoFactorUseCase<A, R>
where
    A: AccountRepository,
    R: RoleRepository,
{
    account_repo: Arc<A>,
    role_repo: Arc<R>,
    issuer: TokenIssuer,
}

impl<A, R> VerifyTwoFactorUseCase<A, R>
where
    A: AccountRepository,
    R: RoleRepository,
{
    pub fn new(account_repo: Arc<A>, role_repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        let issuer = TokenIssuer::new(config.token.clone());
        Self {
            account_repo,
            role_repo,
            issuer,
        }
    }

    pub async fn execute(&self, input: VerifyTwoFactorInput) -> AuthResult<VerifyTwoFactorOutput> {
        let mut account = self
            .account_repo
            .find_by_id(&input.account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !account.is_active {
            return Err(AuthError::AccountNotActivated);
        }

        if !account.totp_secret.verify(&input.code, &account.email)? {
            tracing::warn!(account_id = %account.account_id, "2FA code rejected");
            return Err(AuthError::InvalidTwoFactorCode);
        }

        // First successful check completes enrollment
        if !account.two_factor_enabled {
            account.enable_two_factor();
            self.account_repo.update(&account).await?;
            tracing::info!(account_id = %account.account_id, "2FA enrollment verified");
        }

        let (roles, permissions) = self.resolve_authorities(&account.roles).await?;

        let subject = TokenSubject {
            account_id: account.account_id.to_string(),
            email: account.email.as_str().to_string(),
            roles,
            permissions,
        };

        let token = self.issuer.issue(&subject)?;

        tracing::info!(account_id = %account.account_id, "Session token issued");

        Ok(VerifyTwoFactorOutput { token })
    }

    /// Resolve role names and the union of their permission names
    async fn resolve_authorities(
        &self,
        role_ids: &BTreeSet<kernel::id::RoleId>,
    ) -> AuthResult<(Vec<String>, Vec<String>)> {
        let roles = self.role_repo.find_roles(role_ids).await?;

        let permission_ids: BTreeSet<_> = roles
            .iter()
            .flat_map(|r| r.permissions.iter().copied())
            .collect();

        let permissions = self.role_repo.find_permissions(&permission_ids).await?;

        Ok((
            roles.into_iter().map(|r| r.name).collect(),
            permissions.into_iter().map(|p| p.name).collect(),
        ))
    }
}
