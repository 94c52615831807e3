//! Value Objects

pub mod email;
pub mod totp_secret;

pub use email::Email;
pub use totp_secret::TotpSecret;
