//! Gateway Claim Propagation and Forwarding
//!
//! Middleware pipeline for the API gateway, applied in a fixed order:
//! 1. [`middleware::strip_identity_headers`] removes inbound identity
//!    headers so clients can never forge them
//! 2. [`middleware::propagate_identity`] validates the bearer token and
//!    injects `X-User-Id`, `X-Roles` and `X-Permissions`
//! 3. [`middleware::require_identity`] optionally rejects requests that
//!    carry no valid identity
//!
//! [`forward::Forwarder`] then reverse-proxies the request upstream.

pub mod error;
pub mod forward;
pub mod middleware;
pub mod propagation;

#[cfg(test)]
mod tests;

pub use error::{ProxyError, ProxyResult};
pub use forward::Forwarder;
pub use propagation::{HEADER_PERMISSIONS, HEADER_ROLES, HEADER_USER_ID};
