//! API DTOs (Data Transfer Objects)

use kernel::id::AccountId;
use serde::{Deserialize, Serialize};

// ============================================================================
// Sign Up
// ============================================================================

/// Sign up request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
}

/// Sign up response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub account_id: AccountId,
}

// ============================================================================
// Activation
// ============================================================================

/// Activation request carrying the raw one-time token
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateRequest {
    pub token: String,
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Status value when the caller must enroll an authenticator first
pub const LOGIN_STATUS_SETUP: &str = "2fa_setup";

/// Status value when the caller must present a TOTP code
pub const LOGIN_STATUS_REQUIRED: &str = "2fa_required";

/// Login response.
///
/// Never carries a token; both outcomes continue at `/verify-2fa`.
/// The enrollment fields are present only when `status` is `2fa_setup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub account_id: AccountId,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otpauth_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
}

// ============================================================================
// Verify 2FA
// ============================================================================

/// Verify two-factor request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTwoFactorRequest {
    pub account_id: AccountId,
    pub code: String,
}

/// Token response after successful 2FA verification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
}

// ============================================================================
// User Info
// ============================================================================

/// Current user info response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoResponse {
    pub email: String,
}
