//! Host server configuration parsed from environment variables.
//!
//! Optional:
//! - `PORT`: listen port, default 3000
//! - `API_PROXY_TARGET`: backend base URL, default `http://localhost:8080`
//! - `API_PROXY_PREFIX`: proxied path prefix, default `/api`
//! - `API_PROXY_REWRITE`: replacement for the prefix, default the prefix itself
//! - `API_PROXY_CHANGE_ORIGIN`: send the backend's host instead of the
//!   client's, default true
//! - `API_PROXY_TIMEOUT_SECS`: upstream request timeout, default 30

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PROXY_TARGET: &str = "http://localhost:8080";
pub const DEFAULT_PROXY_PREFIX: &str = "/api";
pub const DEFAULT_PROXY_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} is not a port number")]
    InvalidPort { var: &'static str, value: String },
    #[error("invalid {var}: {value:?} must be an http(s) URL")]
    InvalidTarget { var: &'static str, value: String },
    #[error("invalid {var}: {value:?} must start with `/`")]
    InvalidPrefix { var: &'static str, value: String },
}

/// Where and how `/api` traffic is forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub target: String,
    pub prefix: String,
    pub rewrite_to: String,
    pub change_origin: bool,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub proxy: ProxyConfig,
}

impl ServerConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { var: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let target = var("API_PROXY_TARGET").unwrap_or_else(|| DEFAULT_PROXY_TARGET.to_owned());
        if !(target.starts_with("http://") || target.starts_with("https://")) {
            return Err(ConfigError::InvalidTarget { var: "API_PROXY_TARGET", value: target });
        }
        let target = target.trim_end_matches('/').to_owned();

        let prefix = parse_prefix("API_PROXY_PREFIX", var("API_PROXY_PREFIX"))?
            .unwrap_or_else(|| DEFAULT_PROXY_PREFIX.to_owned());
        let rewrite_to = parse_prefix("API_PROXY_REWRITE", var("API_PROXY_REWRITE"))?
            .unwrap_or_else(|| prefix.clone());

        let change_origin = var("API_PROXY_CHANGE_ORIGIN")
            .and_then(|raw| parse_bool(&raw))
            .unwrap_or(true);
        let timeout_secs = var("API_PROXY_TIMEOUT_SECS")
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_PROXY_TIMEOUT_SECS);

        Ok(Self {
            port,
            proxy: ProxyConfig {
                target,
                prefix,
                rewrite_to,
                change_origin,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn parse_prefix(var: &'static str, raw: Option<String>) -> Result<Option<String>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if !raw.starts_with('/') {
        return Err(ConfigError::InvalidPrefix { var, value: raw });
    }
    let trimmed = raw.trim_end_matches('/');
    Ok(Some(if trimmed.is_empty() { "/".to_owned() } else { trimmed.to_owned() }))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
