//! Upstream Forwarding
//!
//! Reverse-proxy handler: the request is re-sent to the configured
//! upstream with its method, path, query, headers and body intact.
//! Hop-by-hop headers stay on the gateway's connections.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, Request, Response, header};
use std::sync::Arc;

use crate::error::{ProxyError, ProxyResult};

/// Forwarded bodies above this size are rejected
const MAX_FORWARD_BODY: usize = 10 * 1024 * 1024;

/// RFC 9110 hop-by-hop headers, plus Host which the client rewrites
const HOP_BY_HOP: [HeaderName; 9] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::HOST,
];

/// Reverse proxy to a single upstream base URL
#[derive(Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    upstream: String,
}

impl Forwarder {
    pub fn new(upstream: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            upstream: upstream.into().trim_end_matches('/').to_string(),
        }
    }

    /// Send the request upstream and relay the response
    pub async fn forward(&self, req: Request<Body>) -> ProxyResult<Response<Body>> {
        let (parts, body) = req.into_parts();

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let url = format!("{}{}", self.upstream, path_and_query);

        let body_bytes = axum::body::to_bytes(body, MAX_FORWARD_BODY)
            .await
            .map_err(|e| ProxyError::BadRequest(e.to_string()))?;

        tracing::debug!(method = %parts.method, url = %url, "Forwarding request");

        let upstream_response = self
            .client
            .request(parts.method, &url)
            .headers(end_to_end_headers(&parts.headers))
            .body(body_bytes)
            .send()
            .await?;

        let status = upstream_response.status();
        let headers = end_to_end_headers(upstream_response.headers());
        let bytes = upstream_response.bytes().await?;

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = headers;

        Ok(response)
    }
}

/// Axum handler delegating to the shared [`Forwarder`]
pub async fn forward(
    State(forwarder): State<Arc<Forwarder>>,
    req: Request<Body>,
) -> ProxyResult<Response<Body>> {
    forwarder.forward(req).await
}

fn end_to_end_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = HeaderMap::new();
    for (name, value) in headers {
        if !HOP_BY_HOP.contains(name) {
            filtered.append(name.clone(), value.clone());
        }
    }
    filtered
}
