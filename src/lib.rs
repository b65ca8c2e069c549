//! # airwatch-client
//!
//! Leptos + WASM shell of the air-quality monitoring dashboard: login and
//! registration, role-based routing between the user and admin areas, and the
//! persisted auth session.
//!
//! The routing decisions (`router`), session persistence (`state`), and API
//! client configuration (`net`) are plain Rust and run under SSR, in the
//! browser, and in native tests; `app`, `pages`, and `util` wire them into
//! Leptos.

pub mod app;
pub mod net;
pub mod pages;
pub mod router;
pub mod state;
pub mod util;

/// Browser entry point: hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    log::info!("airwatch client hydrating");
    leptos::mount::hydrate_body(app::App);
}
