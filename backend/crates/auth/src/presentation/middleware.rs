//! Auth Middleware
//!
//! Bearer token validation for protected routes. On success the decoded
//! [`Identity`] is placed in request extensions for handlers to read.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use token::{Identity, TokenValidator};

use crate::error::AuthError;

/// Extract the token from an `Authorization: Bearer ...` header
pub fn extract_bearer(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Middleware that requires a valid bearer token
pub async fn require_identity(
    validator: Arc<TokenValidator>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let Some(token) = extract_bearer(&req) else {
        return Err((StatusCode::UNAUTHORIZED, [("X-Auth-Required", "true")]).into_response());
    };

    let identity: Identity = match validator.validate(token) {
        Ok(identity) => identity,
        Err(e) => return Err(AuthError::from(e).into_response()),
    };

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
