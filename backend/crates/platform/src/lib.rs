//! Platform - shared infrastructure primitives
//!
//! Cross-service building blocks with no domain knowledge:
//! - `crypto` - random material, hashing, base64 helpers
//! - `password` - Argon2id password hashing and policy validation
//! - `one_time_token` - single-use activation tokens (raw value + stored hash)

pub mod crypto;
pub mod one_time_token;
pub mod password;
