//! Proxy Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Proxy-specific result type alias
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Proxy-specific error variants
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Upstream service could not be reached or answered with a
    /// transport-level failure
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// Request could not be rebuilt for forwarding
    #[error("Invalid forwarded request: {0}")]
    BadRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    fn kind(&self) -> ErrorKind {
        match self {
            ProxyError::Upstream(_) => ErrorKind::ServiceUnavailable,
            ProxyError::BadRequest(_) => ErrorKind::BadRequest,
            ProxyError::Internal(_) => ErrorKind::InternalServerError,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match &self {
            ProxyError::Upstream(e) => tracing::error!(error = %e, "Upstream request failed"),
            ProxyError::Internal(msg) => tracing::error!(message = %msg, "Proxy internal error"),
            ProxyError::BadRequest(msg) => tracing::debug!(message = %msg, "Rejected forward"),
        }
        AppError::new(self.kind(), self.to_string()).into_response()
    }
}
