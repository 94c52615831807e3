//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use token::TokenValidator;

use crate::application::config::AuthConfig;
use crate::domain::repository::{AccountRepository, ActivationNotifier, RoleRepository};
use crate::infra::notifier::LogNotifier;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_identity;

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(Arc::new(repo), Arc::new(LogNotifier), config)
}

/// Create a generic Auth router for any repository implementation.
///
/// Callers keep their own handle on the `Arc`s, which is how tests
/// observe repository state behind a running router.
pub fn auth_router_generic<R, N>(repo: Arc<R>, notifier: Arc<N>, config: AuthConfig) -> Router
where
    R: AccountRepository + RoleRepository + Send + Sync + 'static,
    N: ActivationNotifier + Send + Sync + 'static,
{
    let validator = Arc::new(TokenValidator::new(config.token.clone()));

    let state = AuthAppState {
        repo,
        notifier,
        config: Arc::new(config),
        validator: validator.clone(),
    };

    let protected = Router::new()
        .route("/userinfo", get(handlers::user_info::<R, N>))
        .route_layer(axum::middleware::from_fn(move |req, next| {
            let validator = validator.clone();
            async move { require_identity(validator, req, next).await }
        }));

    Router::new()
        .route("/signup", post(handlers::sign_up::<R, N>))
        .route("/activate", post(handlers::activate::<R, N>))
        .route("/login", post(handlers::login::<R, N>))
        .route("/verify-2fa", post(handlers::verify_two_factor::<R, N>))
        .merge(protected)
        .with_state(state)
}
