//! Session Token Module
//!
//! Stateless bearer-token issuance and validation:
//! - `config` - shared signing secret and issuer settings
//! - `claims` - the signed claim set (subject, roles, authorities, expiry)
//! - `issuer` - builds and signs tokens for an authenticated account
//! - `validator` - verifies signature/expiry and extracts an [`Identity`]
//!
//! ## Security Model
//! - HMAC-SHA256 over a shared secret of at least 32 bytes
//! - Fixed 1-hour token lifetime, no server-side session state
//! - Validation is pure: it mutates nothing and returns errors as values

pub mod claims;
pub mod config;
pub mod error;
pub mod issuer;
pub mod validator;

pub use claims::{Claims, TokenSubject};
pub use config::TokenConfig;
pub use error::TokenError;
pub use issuer::TokenIssuer;
pub use validator::{Identity, TokenValidator};
