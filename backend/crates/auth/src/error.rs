//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;
use token::TokenError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Account not found
    #[error("Account not found")]
    AccountNotFound,

    /// Email already registered
    #[error("Email already registered")]
    EmailTaken,

    /// Invalid credentials (unknown email or wrong password)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Valid credentials but the account was never activated
    #[error("Account not activated")]
    AccountNotActivated,

    /// TOTP code mismatch
    #[error("Invalid 2FA Code")]
    InvalidTwoFactorCode,

    /// Activation token unknown or already used
    #[error("Invalid activation token")]
    ActivationTokenInvalid,

    /// Activation token past its TTL
    #[error("Activation token has expired")]
    ActivationTokenExpired,

    /// Account is already active
    #[error("Account is already activated")]
    AlreadyActivated,

    /// QR rendering of the provisioning URI failed
    #[error("Failed to generate QR code")]
    QrGeneration(String),

    /// Input validation error (email format, password policy)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Session token error
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::AccountNotFound => StatusCode::NOT_FOUND,
            AuthError::EmailTaken | AuthError::AlreadyActivated => StatusCode::CONFLICT,
            AuthError::InvalidCredentials | AuthError::AccountNotActivated => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::InvalidTwoFactorCode | AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::ActivationTokenInvalid => StatusCode::UNAUTHORIZED,
            AuthError::ActivationTokenExpired => StatusCode::GONE,
            AuthError::Token(e) => match e {
                TokenError::Expired | TokenError::SignatureInvalid | TokenError::Malformed => {
                    StatusCode::UNAUTHORIZED
                }
                TokenError::SecretTooShort { .. } | TokenError::Issuance(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AuthError::QrGeneration(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::AccountNotFound => ErrorKind::NotFound,
            AuthError::EmailTaken | AuthError::AlreadyActivated => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::AccountNotActivated
            | AuthError::ActivationTokenInvalid => ErrorKind::Unauthorized,
            AuthError::InvalidTwoFactorCode | AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::ActivationTokenExpired => ErrorKind::Gone,
            AuthError::Token(e) => match e {
                TokenError::Expired | TokenError::SignatureInvalid | TokenError::Malformed => {
                    ErrorKind::Unauthorized
                }
                _ => ErrorKind::InternalServerError,
            },
            AuthError::QrGeneration(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::QrGeneration(msg) => {
                tracing::error!(message = %msg, "QR code generation failed");
            }
            AuthError::Token(TokenError::SecretTooShort { .. })
            | AuthError::Token(TokenError::Issuance(_)) => {
                tracing::error!(error = %self, "Token configuration error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountNotActivated => {
                tracing::warn!("Login attempt on inactive account");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
