//! Backend auth endpoints used by the login and registration pages.
//!
//! ERROR HANDLING
//! ==============
//! Failures come back as [`ApiError`] from the client unchanged; pages turn
//! them into display strings with [`user_message`].

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::http::{ApiClient, ApiError, HttpMethod, TokenSource};
use super::types::{LoginRequest, LoginResponse, RegisterRequest};

pub const LOGIN_ENDPOINT: &str = "/api/auth/login";
pub const REGISTER_ENDPOINT: &str = "/api/auth/register";

/// Exchange credentials for a token and user record via `POST /api/auth/login`.
///
/// # Errors
///
/// Returns [`ApiError`] on transport failure, timeout, non-2xx status, or a
/// response without a token.
pub async fn login<T: TokenSource>(
    client: &ApiClient<T>,
    credentials: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let response: LoginResponse = client.post_json(LOGIN_ENDPOINT, credentials).await?;
    if response.token.is_empty() {
        return Err(ApiError::Decode("login response carried an empty token".to_owned()));
    }
    Ok(response)
}

/// Create an account via `POST /api/auth/register`. The response body is
/// ignored.
///
/// # Errors
///
/// Returns [`ApiError`] on transport failure, timeout, or non-2xx status.
pub async fn register<T: TokenSource>(
    client: &ApiClient<T>,
    request: &RegisterRequest,
) -> Result<(), ApiError> {
    let payload = serde_json::to_string(request).map_err(|e| ApiError::Decode(e.to_string()))?;
    client
        .send(client.prepare(HttpMethod::Post, REGISTER_ENDPOINT, Some(payload)))
        .await?;
    Ok(())
}

/// Short message for an auth failure, suitable for a form.
pub fn user_message(err: &ApiError) -> String {
    if matches!(err.status(), Some(401 | 403)) {
        return "Invalid username or password.".to_owned();
    }
    match err {
        ApiError::Status { message, .. } => message.clone(),
        ApiError::Timeout { .. } => "The server took too long to respond.".to_owned(),
        ApiError::Transport(_) | ApiError::Unavailable => "Unable to reach the server.".to_owned(),
        ApiError::Decode(_) => "Unexpected response from the server.".to_owned(),
    }
}
