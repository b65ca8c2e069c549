//! Reverse proxy for backend API traffic.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser client talks to the backend through this server during
//! development so API calls stay same-origin. Requests under the configured
//! prefix are forwarded with their method, headers, query, and body; the
//! backend's status, headers, and body are returned as-is.
//!
//! ERROR HANDLING
//! ==============
//! Upstream failures become `502`/`504` with a JSON `{"error": ...}` body so the
//! client's error pass-through sees a normal HTTP error.

#[cfg(test)]
#[path = "proxy_test.rs"]
mod proxy_test;

use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{self, HeaderMap, HeaderName};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::config::ProxyConfig;

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("request body rejected: {0}")]
    Body(String),
    #[error("upstream request timed out")]
    Timeout,
    #[error("upstream request failed: {0}")]
    Upstream(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Body(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Upstream(err.to_string())
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Shared proxy client and settings.
#[derive(Clone)]
pub struct ProxyState {
    client: reqwest::Client,
    config: Arc<ProxyConfig>,
}

impl ProxyState {
    /// Build the upstream client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client, config: Arc::new(config) })
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Replace a leading `from` prefix of `path_and_query` with `to`.
///
/// Paths that do not start with `from` on a segment boundary are returned
/// unchanged.
pub fn rewrite_path(path_and_query: &str, from: &str, to: &str) -> String {
    let Some(rest) = path_and_query.strip_prefix(from) else {
        return path_and_query.to_owned();
    };
    if !(rest.is_empty() || rest.starts_with(['/', '?']) || from.ends_with('/')) {
        return path_and_query.to_owned();
    }
    let to = to.trim_end_matches('/');
    if rest.is_empty() || rest.starts_with('?') {
        let to = if to.is_empty() { "/" } else { to };
        return format!("{to}{rest}");
    }
    if from.ends_with('/') {
        format!("{to}/{rest}")
    } else {
        format!("{to}{rest}")
    }
}

/// Join the upstream base URL and a rewritten path.
pub fn upstream_url(target: &str, path_and_query: &str) -> String {
    let target = target.trim_end_matches('/');
    if path_and_query.starts_with('/') {
        format!("{target}{path_and_query}")
    } else {
        format!("{target}/{path_and_query}")
    }
}

/// Drop hop-by-hop headers; with `change_origin`, also drop `host` so the
/// upstream sees its own.
pub fn strip_forwarded_headers(headers: &mut HeaderMap, change_origin: bool) {
    for name in &HOP_BY_HOP {
        headers.remove(name);
    }
    headers.remove("keep-alive");
    if change_origin {
        headers.remove(header::HOST);
    }
}

/// Forward one request to the backend.
pub async fn forward(State(proxy): State<ProxyState>, req: Request) -> Result<Response, ProxyError> {
    let (parts, body) = req.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path(), |pq| pq.as_str());
    let config = proxy.config();
    let url = upstream_url(
        &config.target,
        &rewrite_path(path_and_query, &config.prefix, &config.rewrite_to),
    );

    let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| ProxyError::Body(e.to_string()))?;
    let mut headers = parts.headers;
    strip_forwarded_headers(&mut headers, config.change_origin);

    let method = parts.method;
    tracing::debug!(%method, %url, "proxying api request");
    let upstream = proxy
        .client
        .request(method.clone(), &url)
        .headers(headers)
        .body(body)
        .send()
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, %method, %url, "upstream request failed");
            ProxyError::from(e)
        })?;

    let status = upstream.status();
    let mut response_headers = upstream.headers().clone();
    strip_forwarded_headers(&mut response_headers, false);
    let bytes = upstream.bytes().await.map_err(ProxyError::from)?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    Ok(response)
}
