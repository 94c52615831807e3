//! Gateway Entry Point
//!
//! Validates bearer tokens at the edge, rewrites them into identity
//! headers and reverse-proxies everything to the upstream service.

use axum::Router;
use axum::routing::any;
use base64::Engine;
use base64::engine::general_purpose;
use proxy::{Forwarder, forward, middleware};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use token::{TokenConfig, TokenValidator};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gateway=info,proxy=info,token=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // The gateway only validates; it shares the secret with the issuer.
    // A short secret aborts startup.
    let token_config = if cfg!(debug_assertions) {
        TokenConfig::with_random_secret()
    } else {
        let secret_b64 = env::var("JWT_SECRET").expect("JWT_SECRET must be set in production");
        let secret = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
        TokenConfig::new(secret)?
    };

    let validator = Arc::new(TokenValidator::new(Arc::new(token_config)));

    let upstream = env::var("UPSTREAM_URL").expect("UPSTREAM_URL must be set in environment");
    let forwarder = Arc::new(Forwarder::new(upstream));

    let require_auth = env::var("REQUIRE_AUTH")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    let mut app = Router::new()
        .route("/", any(forward::forward))
        .route("/{*path}", any(forward::forward))
        .with_state(forwarder);

    if require_auth {
        app = app.layer(axum::middleware::from_fn(middleware::require_identity));
    }

    // Outermost layer runs first: strip, then propagate
    let app = app
        .layer(axum::middleware::from_fn(move |req, next| {
            let validator = validator.clone();
            async move { middleware::propagate_identity(validator, req, next).await }
        }))
        .layer(axum::middleware::from_fn(middleware::strip_identity_headers))
        .layer(TraceLayer::new_for_http());

    // Start server
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Gateway listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
