//! Login Use Case
//!
//! First step of the two-phase login. Verifies the password and reports
//! the 2FA state; no token is issued here. First-time callers get the
//! enrollment payload (otpauth URI plus QR), returning callers are just
//! told to present a code.

use std::sync::Arc;

use kernel::id::AccountId;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    /// Email address
    pub email: String,
    /// Clear text password
    pub password: String,
}

/// Login outcome, always one step short of a token
#[derive(Debug)]
pub enum LoginOutput {
    /// First login: the caller must enroll an authenticator app
    SetupRequired {
        account_id: AccountId,
        /// otpauth:// provisioning URI
        otpauth_url: String,
        /// Provisioning URI as base64-encoded QR PNG
        qr_code: String,
    },
    /// Returning login: a current TOTP code completes authentication
    CodeRequired { account_id: AccountId },
}

/// Login use case
pub struct LoginUseCase<A>
where
    A: AccountRepository,
{
    account_repo: Arc<A>,
    config: Arc<AuthConfig>,
}

impl<A> LoginUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(account_repo: Arc<A>, config: Arc<AuthConfig>) -> Self {
        Self {
            account_repo,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        // Malformed email or policy-violating password cannot match any
        // account, so both collapse into InvalidCredentials
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let account = self
            .account_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password =
            ClearTextPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        if !account.password_hash.verify(&password, self.config.pepper()) {
            tracing::warn!(account_id = %account.account_id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        // Activation state is only disclosed after the password checks out
        if !account.is_active {
            return Err(AuthError::AccountNotActivated);
        }

        if account.two_factor_enabled {
            tracing::info!(account_id = %account.account_id, "Login pending 2FA code");
            return Ok(LoginOutput::CodeRequired {
                account_id: account.account_id,
            });
        }

        let otpauth_url = account.totp_secret.provisioning_uri(&account.email)?;
        let qr_code = account.totp_secret.qr_png_base64(&account.email)?;

        tracing::info!(account_id = %account.account_id, "Login pending 2FA enrollment");

        Ok(LoginOutput::SetupRequired {
            account_id: account.account_id,
            otpauth_url,
            qr_code,
        })
    }
}
