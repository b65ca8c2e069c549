//! Client-side routing: route table, navigation guard, and resolver.
//!
//! DESIGN
//! ======
//! All three pieces are pure functions of their inputs so they run unchanged
//! under SSR, in the browser, and in native tests. The Leptos wiring lives in
//! `util::guard`.

pub mod guard;
pub mod navigation;
pub mod routes;
