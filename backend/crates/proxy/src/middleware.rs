//! Gateway Middleware Pipeline
//!
//! Three layers, wired in this order by the gateway binary:
//! strip, propagate, then (optionally, per route) require.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use token::TokenValidator;

use crate::propagation;

/// Remove inbound identity headers unconditionally.
///
/// Runs before propagation so a forged header can never survive a
/// request without a token.
pub async fn strip_identity_headers(mut req: Request<Body>, next: Next) -> Response {
    propagation::strip(req.headers_mut());
    next.run(req).await
}

/// Validate the bearer token, if any, and inject identity headers.
///
/// Requests without a token, or with an invalid one, pass through
/// untouched; rejecting them is the job of [`require_identity`].
pub async fn propagate_identity(
    validator: Arc<TokenValidator>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = extract_bearer(&req) {
        match validator.validate(token) {
            Ok(identity) => {
                propagation::inject(req.headers_mut(), &identity);
                req.extensions_mut().insert(identity);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Bearer token rejected, forwarding anonymously");
            }
        }
    }

    next.run(req).await
}

/// Reject requests that did not acquire an identity during propagation
pub async fn require_identity(req: Request<Body>, next: Next) -> Result<Response, Response> {
    if req.extensions().get::<token::Identity>().is_none() {
        return Err((StatusCode::UNAUTHORIZED, [("X-Auth-Required", "true")]).into_response());
    }

    Ok(next.run(req).await)
}

fn extract_bearer(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
