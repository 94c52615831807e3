//! Pipeline tests: header stripping, claim propagation and forwarding.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, Request, StatusCode, header};
use axum::routing::any;
use http_body_util::BodyExt;
use tower::ServiceExt;

use token::{TokenConfig, TokenIssuer, TokenSubject, TokenValidator};

use crate::middleware;
use crate::propagation::{HEADER_PERMISSIONS, HEADER_ROLES, HEADER_USER_ID};

fn token_setup() -> (Arc<TokenValidator>, TokenIssuer, Arc<TokenConfig>) {
    let config = Arc::new(TokenConfig::with_random_secret());
    (
        Arc::new(TokenValidator::new(config.clone())),
        TokenIssuer::new(config.clone()),
        config,
    )
}

fn issue(issuer: &TokenIssuer, account_id: &str, roles: &[&str], permissions: &[&str]) -> String {
    issuer
        .issue(&TokenSubject {
            account_id: account_id.to_string(),
            email: "a@x.com".to_string(),
            roles: roles.iter().map(|s| s.to_string()).collect(),
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
        })
        .unwrap()
}

/// Echo back the identity headers the pipeline delivered
async fn echo(headers: HeaderMap) -> axum::Json<serde_json::Value> {
    let get = |name: HeaderName| {
        headers
            .get(&name)
            .map(|v| v.to_str().unwrap().to_string())
    };
    axum::Json(serde_json::json!({
        "userId": get(HEADER_USER_ID),
        "roles": get(HEADER_ROLES),
        "permissions": get(HEADER_PERMISSIONS),
    }))
}

fn pipeline(validator: Arc<TokenValidator>, require: bool) -> Router {
    let mut router = Router::new().route("/echo", any(echo));

    if require {
        router = router.layer(axum::middleware::from_fn(middleware::require_identity));
    }

    // Outermost layer last: strip runs first, then propagate
    router
        .layer(axum::middleware::from_fn(move |req, next| {
            let validator = validator.clone();
            async move { middleware::propagate_identity(validator, req, next).await }
        }))
        .layer(axum::middleware::from_fn(middleware::strip_identity_headers))
}

async fn call(router: &Router, bearer: Option<&str>, forged: bool) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method("GET").uri("/echo");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    if forged {
        builder = builder
            .header(&HEADER_USER_ID, "intruder")
            .header(&HEADER_ROLES, "ROLE_ADMIN")
            .header(&HEADER_PERMISSIONS, "WRITE");
    }
    let response = router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_propagates_exact_claim_headers() {
    let (validator, issuer, _) = token_setup();
    let app = pipeline(validator, false);

    let token = issue(&issuer, "acct-1", &["admin"], &["read"]);
    let (status, json) = call(&app, Some(&token), false).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["userId"], "acct-1");
    assert_eq!(json["roles"], "ROLE_ADMIN");
    assert_eq!(json["permissions"], "READ");
}

#[tokio::test]
async fn test_forged_headers_are_stripped_without_token() {
    let (validator, _, _) = token_setup();
    let app = pipeline(validator, false);

    let (status, json) = call(&app, None, true).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["userId"], serde_json::Value::Null);
    assert_eq!(json["roles"], serde_json::Value::Null);
    assert_eq!(json["permissions"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_forged_headers_replaced_by_token_claims() {
    let (validator, issuer, _) = token_setup();
    let app = pipeline(validator, false);

    let token = issue(&issuer, "acct-2", &["user"], &["read"]);
    let (status, json) = call(&app, Some(&token), true).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["userId"], "acct-2");
    assert_eq!(json["roles"], "ROLE_USER");
    assert_eq!(json["permissions"], "READ");
}

#[tokio::test]
async fn test_invalid_token_passes_through_anonymously() {
    let (validator, _, _) = token_setup();
    let app = pipeline(validator, false);

    // A token signed with a different secret is ignored, not rejected
    let other_issuer = TokenIssuer::new(Arc::new(TokenConfig::with_random_secret()));
    let token = issue(&other_issuer, "acct-3", &["admin"], &["read"]);

    let (status, json) = call(&app, Some(&token), false).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["userId"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_require_identity_rejects_anonymous() {
    let (validator, issuer, _) = token_setup();
    let app = pipeline(validator, true);

    let (status, _) = call(&app, None, false).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = issue(&issuer, "acct-4", &["user"], &["read"]);
    let (status, _) = call(&app, Some(&token), false).await;
    assert_eq!(status, StatusCode::OK);
}

mod forwarding {
    use super::*;

    use crate::forward::Forwarder;

    /// Upstream that reports what it received
    async fn upstream_echo(req: Request<Body>) -> axum::Json<serde_json::Value> {
        let (parts, body) = req.into_parts();
        let bytes = axum::body::to_bytes(body, 1024 * 1024).await.unwrap();
        axum::Json(serde_json::json!({
            "method": parts.method.as_str(),
            "uri": parts.uri.to_string(),
            "body": String::from_utf8_lossy(&bytes),
            "connectionHeader": parts.headers.contains_key(header::CONNECTION),
        }))
    }

    async fn spawn_upstream() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/{*path}", any(upstream_echo));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_forward_preserves_method_path_query_body() {
        let upstream = spawn_upstream().await;
        let forwarder = Forwarder::new(&upstream);

        let request = Request::builder()
            .method("POST")
            .uri("/api/things?limit=5")
            .header(header::CONNECTION, "keep-alive")
            .body(Body::from("payload"))
            .unwrap();

        let response = forwarder.forward(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["method"], "POST");
        assert_eq!(json["uri"], "/api/things?limit=5");
        assert_eq!(json["body"], "payload");
        // Hop-by-hop headers stay on the gateway connection
        assert_eq!(json["connectionHeader"], false);
    }

    #[tokio::test]
    async fn test_forward_unreachable_upstream_is_service_unavailable() {
        use axum::response::IntoResponse;

        let forwarder = Forwarder::new("http://127.0.0.1:1");

        let request = Request::builder()
            .uri("/anything")
            .body(Body::empty())
            .unwrap();

        let err = forwarder.forward(request).await.unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
