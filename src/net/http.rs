//! HTTP client configuration for the backend API.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`, bounded by a
//! `gloo-timers` timeout. Server-side (SSR) and native tests: requests are
//! prepared identically but sending reports [`ApiError::Unavailable`].
//!
//! INTERCEPTORS
//! ============
//! [`ApiClient::prepare`] attaches `Authorization: Bearer <token>` when the
//! session holds a token, reading it at send time. [`observe`] logs every
//! failure and hands it back unchanged. There is no retry or backoff.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use leptos::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::ErrorBody;
use crate::state::session::{BrowserSessionStore, Session, SessionStore};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_MS: u32 = 10_000;

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Errors surfaced to API callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("request could not be sent: {0}")]
    Transport(String),
    #[error("request timed out after {ms} ms")]
    Timeout { ms: u32 },
    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("HTTP requests are only available in the browser")]
    Unavailable,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Fixed client defaults, overridable at build time through
/// `AIRWATCH_API_BASE_URL` and `AIRWATCH_API_TIMEOUT_MS`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ApiConfig {
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("AIRWATCH_API_BASE_URL"),
            option_env!("AIRWATCH_API_TIMEOUT_MS"),
        )
    }

    fn from_values(base_url: Option<&str>, timeout_ms: Option<&str>) -> Self {
        let defaults = Self::default();
        Self {
            base_url: base_url
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map_or(defaults.base_url, str::to_owned),
            timeout_ms: timeout_ms
                .and_then(|v| v.trim().parse().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.timeout_ms),
        }
    }

    /// Absolute URL for `path`. Absolute inputs are returned untouched.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if base.is_empty() {
            format!("/{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

/// Supplies the bearer token for outgoing requests.
pub trait TokenSource {
    /// Current token, `None` when signed out.
    fn bearer_token(&self) -> Option<String>;
}

impl TokenSource for Session {
    fn bearer_token(&self) -> Option<String> {
        self.is_authenticated().then(|| self.token().to_owned())
    }
}

impl<S> TokenSource for SessionStore<S> {
    fn bearer_token(&self) -> Option<String> {
        self.session().bearer_token()
    }
}

impl<S> TokenSource for RwSignal<SessionStore<S>>
where
    S: Send + Sync + 'static,
{
    fn bearer_token(&self) -> Option<String> {
        self.with_untracked(|store| store.session().bearer_token())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A request after the request interceptor ran.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A 2xx response with its raw body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the body does not match `R`.
    pub fn json<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Client reading its token from the app's session signal.
pub type BrowserApiClient = ApiClient<RwSignal<BrowserSessionStore>>;

/// Backend API client bound to a token source.
#[derive(Clone, Debug)]
pub struct ApiClient<T> {
    config: ApiConfig,
    tokens: T,
}

impl<T: TokenSource> ApiClient<T> {
    pub fn new(config: ApiConfig, tokens: T) -> Self {
        Self { config, tokens }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Build a request for `path`, applying the default headers and the
    /// session's bearer token.
    pub fn prepare(&self, method: HttpMethod, path: &str, body: Option<String>) -> ApiRequest {
        let mut headers = vec![("Content-Type".to_owned(), "application/json".to_owned())];
        if let Some(token) = self.tokens.bearer_token() {
            headers.push(("Authorization".to_owned(), format!("Bearer {token}")));
        }
        ApiRequest {
            method,
            url: self.config.url(path),
            headers,
            body,
        }
    }

    /// Send a prepared request.
    ///
    /// # Errors
    ///
    /// Returns the transport, timeout, or non-2xx status error after logging it.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        observe(self.execute(request).await)
    }

    /// `POST` `body` as JSON to `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`]; decode failures are reported as [`ApiError::Decode`].
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        let request = self.prepare(HttpMethod::Post, path, Some(payload));
        let response = self.send(request).await?;
        observe(response.json())
    }

    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            use futures::future::{Either, select};
            use gloo_net::http::Request;

            let builder = match request.method {
                HttpMethod::Get => Request::get(&request.url),
                HttpMethod::Post => Request::post(&request.url),
            };
            let builder = request
                .headers
                .iter()
                .fold(builder, |b, (key, value)| b.header(key, value));
            let built = match request.body {
                Some(body) => builder.body(body),
                None => builder.build(),
            }
            .map_err(|e| ApiError::Transport(e.to_string()))?;

            let ms = self.config.timeout_ms;
            let send = built.send();
            let timeout = gloo_timers::future::TimeoutFuture::new(ms);
            futures::pin_mut!(send, timeout);
            let resp = match select(send, timeout).await {
                Either::Left((result, _)) => result.map_err(|e| ApiError::Transport(e.to_string()))?,
                Either::Right(_) => return Err(ApiError::Timeout { ms }),
            };

            let status = resp.status();
            let body = resp.text().await.map_err(|e| ApiError::Decode(e.to_string()))?;
            if !(200..300).contains(&status) {
                return Err(status_error(status, &body));
            }
            Ok(ApiResponse { status, body })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(ApiError::Unavailable)
        }
    }
}

/// Response interceptor: log failures, then pass the result through as-is.
pub fn observe<R>(result: Result<R, ApiError>) -> Result<R, ApiError> {
    if let Err(err) = &result {
        log::error!("request failed: {err}");
    }
    result
}

/// Build a status error, preferring the backend's `error`/`message` field.
pub fn status_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "no response body".to_owned()
            } else {
                trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
            }
        });
    ApiError::Status { status, message }
}
