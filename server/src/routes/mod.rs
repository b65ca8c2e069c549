//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module stitches the backend API proxy and Leptos SSR rendering under a
//! single Axum router. Everything under the proxy prefix goes to the backend;
//! every other page path is rendered by the Leptos app, and compiled client
//! assets are served from `/pkg`.

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{any, get};
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::proxy::{self, ProxyState};

/// Health check plus the backend proxy mounted at the configured prefix.
pub fn api_routes(state: ProxyState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let prefix = state.config().prefix.clone();
    let router = Router::new().route("/healthz", get(healthz));
    let router = if prefix == "/" {
        router.fallback(proxy::forward)
    } else {
        router
            .route(&prefix, any(proxy::forward))
            .route(&format!("{prefix}/{{*rest}}"), any(proxy::forward))
    };
    router.layer(cors).with_state(state)
}

/// Proxy routes + Leptos SSR + static client assets.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing or
/// malformed `[workspace.metadata.leptos]` section).
pub fn app(state: ProxyState) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(airwatch_client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || airwatch_client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(api_routes(state)
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg")))
        .layer(TraceLayer::new_for_http()))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
