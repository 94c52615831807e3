//! TOTP Secret Value Object
//!
//! Wraps the shared secret for RFC 6238 two-factor authentication.
//! Uses Google Authenticator compatible settings (SHA1, 6 digits, 30 s).
//! A secret is generated exactly once when the account is created and is
//! never regenerated implicitly.

use serde::{Deserialize, Serialize};
use totp_rs::{Algorithm, Secret, TOTP};

use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// TOTP configuration constants
const TOTP_DIGITS: usize = 6;
const TOTP_STEP: u64 = 30;
const TOTP_ISSUER: &str = "Gatehouse";

/// TOTP Secret for two-factor authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotpSecret {
    /// Base32-encoded secret
    secret_base32: String,
}

impl TotpSecret {
    /// Generate a new random TOTP secret
    pub fn generate() -> Self {
        let secret = Secret::generate_secret();
        Self {
            secret_base32: secret.to_encoded().to_string(),
        }
    }

    /// Create from a base32-encoded string (from database)
    pub fn from_base32(secret: impl Into<String>) -> AuthResult<Self> {
        let secret_str = secret.into();
        // Validate by trying to decode
        Secret::Encoded(secret_str.clone())
            .to_bytes()
            .map_err(|e| AuthError::Internal(format!("Invalid TOTP secret: {:?}", e)))?;

        Ok(Self {
            secret_base32: secret_str,
        })
    }

    /// Get the base32-encoded secret for storage
    pub fn as_base32(&self) -> &str {
        &self.secret_base32
    }

    /// Create a TOTP instance labelled with the account email
    fn to_totp(&self, email: &Email) -> AuthResult<TOTP> {
        if email.as_str().is_empty() {
            return Err(AuthError::Validation(
                "Provisioning label cannot be empty".to_string(),
            ));
        }

        let secret = Secret::Encoded(self.secret_base32.clone());

        TOTP::new(
            Algorithm::SHA1,
            TOTP_DIGITS,
            1, // skew (allow 1 step before/after)
            TOTP_STEP,
            secret
                .to_bytes()
                .map_err(|e| AuthError::Internal(format!("Invalid TOTP secret: {:?}", e)))?,
            Some(TOTP_ISSUER.to_string()),
            email.as_str().to_string(),
        )
        .map_err(|e| AuthError::Internal(format!("Failed to create TOTP: {}", e)))
    }

    /// Verify a TOTP code against the current time window.
    ///
    /// No side effects; codes are not tracked for single use.
    pub fn verify(&self, code: &str, email: &Email) -> AuthResult<bool> {
        let totp = self.to_totp(email)?;
        Ok(totp.check_current(code).unwrap_or(false))
    }

    /// Get the otpauth:// provisioning URI for authenticator apps.
    ///
    /// The URI always spells out `algorithm`, `digits` and `period`, even
    /// though they match authenticator defaults. totp-rs leaves defaulted
    /// parameters out of `get_url`, so they are appended here.
    pub fn provisioning_uri(&self, email: &Email) -> AuthResult<String> {
        let totp = self.to_totp(email)?;
        Ok(format!(
            "{}&algorithm=SHA1&digits={}&period={}",
            totp.get_url(),
            TOTP_DIGITS,
            TOTP_STEP
        ))
    }

    /// Render the provisioning URI as a base64-encoded QR PNG
    pub fn qr_png_base64(&self, email: &Email) -> AuthResult<String> {
        let totp = self.to_totp(email)?;
        totp.get_qr_base64()
            .map_err(|e| AuthError::QrGeneration(e.to_string()))
    }

    /// Generate the current TOTP code (for testing)
    #[cfg(test)]
    pub fn generate_current(&self, email: &Email) -> AuthResult<String> {
        let totp = self.to_totp(email)?;
        totp.generate_current()
            .map_err(|e| AuthError::Internal(format!("Failed to generate TOTP: {}", e)))
    }
}
