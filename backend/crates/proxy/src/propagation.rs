//! Identity Header Propagation
//!
//! Downstream services never see the bearer token; they trust three
//! headers that only the gateway is allowed to set. The inbound copies
//! of these headers are therefore always removed before injection.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use token::Identity;

/// Authenticated account ID
pub const HEADER_USER_ID: HeaderName = HeaderName::from_static("x-user-id");

/// Comma-joined `ROLE_`-prefixed role authorities
pub const HEADER_ROLES: HeaderName = HeaderName::from_static("x-roles");

/// Comma-joined permission authorities
pub const HEADER_PERMISSIONS: HeaderName = HeaderName::from_static("x-permissions");

/// Remove all identity headers, whatever the client sent
pub fn strip(headers: &mut HeaderMap) {
    headers.remove(HEADER_USER_ID);
    headers.remove(HEADER_ROLES);
    headers.remove(HEADER_PERMISSIONS);
}

/// Inject the identity headers for a validated token.
///
/// Role and permission sets are ordered, so the joined values are
/// deterministic. Empty sets produce no header.
pub fn inject(headers: &mut HeaderMap, identity: &Identity) {
    if let Ok(value) = HeaderValue::from_str(&identity.subject) {
        headers.insert(HEADER_USER_ID, value);
    }

    if !identity.roles.is_empty() {
        let roles = identity.roles.iter().cloned().collect::<Vec<_>>().join(",");
        if let Ok(value) = HeaderValue::from_str(&roles) {
            headers.insert(HEADER_ROLES, value);
        }
    }

    if !identity.permissions.is_empty() {
        let permissions = identity
            .permissions
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(",");
        if let Ok(value) = HeaderValue::from_str(&permissions) {
            headers.insert(HEADER_PERMISSIONS, value);
        }
    }
}
