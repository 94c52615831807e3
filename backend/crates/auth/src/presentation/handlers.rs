//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;

use token::{Identity, TokenValidator};

use crate::application::config::AuthConfig;
use crate::application::{
    ActivateAccountUseCase, LoginInput, LoginOutput, LoginUseCase, SignUpInput, SignUpUseCase,
    UserInfoUseCase, VerifyTwoFactorInput, VerifyTwoFactorUseCase,
};
use crate::domain::repository::{AccountRepository, ActivationNotifier, RoleRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    ActivateRequest, LOGIN_STATUS_REQUIRED, LOGIN_STATUS_SETUP, LoginRequest, LoginResponse,
    SignUpRequest, SignUpResponse, TokenResponse, UserInfoResponse, VerifyTwoFactorRequest,
};

/// Shared state for auth handlers
pub struct AuthAppState<R, N>
where
    R: AccountRepository + RoleRepository + Send + Sync + 'static,
    N: ActivationNotifier + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub notifier: Arc<N>,
    pub config: Arc<AuthConfig>,
    pub validator: Arc<TokenValidator>,
}

// Manual Clone: the repository itself need not be Clone, only the Arcs are
impl<R, N> Clone for AuthAppState<R, N>
where
    R: AccountRepository + RoleRepository + Send + Sync + 'static,
    N: ActivationNotifier + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            notifier: self.notifier.clone(),
            config: self.config.clone(),
            validator: self.validator.clone(),
        }
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /auth/signup
pub async fn sign_up<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + RoleRepository + Send + Sync + 'static,
    N: ActivationNotifier + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    let input = SignUpInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            account_id: output.account_id,
        }),
    ))
}

// ============================================================================
// Activation
// ============================================================================

/// POST /auth/activate
pub async fn activate<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Json(req): Json<ActivateRequest>,
) -> AuthResult<StatusCode>
where
    R: AccountRepository + RoleRepository + Send + Sync + 'static,
    N: ActivationNotifier + Send + Sync + 'static,
{
    let use_case = ActivateAccountUseCase::new(state.repo.clone(), state.notifier.clone());

    use_case.execute(&req.token).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Login
// ============================================================================

/// POST /auth/login
pub async fn login<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    R: AccountRepository + RoleRepository + Send + Sync + 'static,
    N: ActivationNotifier + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.config.clone());

    let input = LoginInput {
        email: req.email,
        password: req.password,
    };

    let response = match use_case.execute(input).await? {
        LoginOutput::SetupRequired {
            account_id,
            otpauth_url,
            qr_code,
        } => LoginResponse {
            account_id,
            status: LOGIN_STATUS_SETUP.to_string(),
            otpauth_url: Some(otpauth_url),
            qr_code: Some(qr_code),
        },
        LoginOutput::CodeRequired { account_id } => LoginResponse {
            account_id,
            status: LOGIN_STATUS_REQUIRED.to_string(),
            otpauth_url: None,
            qr_code: None,
        },
    };

    Ok(Json(response))
}

// ============================================================================
// Verify 2FA
// ============================================================================

/// POST /auth/verify-2fa
pub async fn verify_two_factor<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Json(req): Json<VerifyTwoFactorRequest>,
) -> AuthResult<Json<TokenResponse>>
where
    R: AccountRepository + RoleRepository + Send + Sync + 'static,
    N: ActivationNotifier + Send + Sync + 'static,
{
    let use_case =
        VerifyTwoFactorUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let input = VerifyTwoFactorInput {
        account_id: req.account_id,
        code: req.code,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(TokenResponse {
        token: output.token,
    }))
}

// ============================================================================
// User Info (requires authentication)
// ============================================================================

/// GET /auth/userinfo
pub async fn user_info<R, N>(
    State(state): State<AuthAppState<R, N>>,
    axum::Extension(identity): axum::Extension<Identity>,
) -> AuthResult<Json<UserInfoResponse>>
where
    R: AccountRepository + RoleRepository + Send + Sync + 'static,
    N: ActivationNotifier + Send + Sync + 'static,
{
    let use_case = UserInfoUseCase::new(state.repo.clone());

    let account = use_case.execute(&identity).await?;

    Ok(Json(UserInfoResponse {
        email: account.email.as_str().to_string(),
    }))
}
