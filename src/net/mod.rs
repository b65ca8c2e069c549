//! Networking modules for the backend REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` owns the client configuration and interceptors, `api` the auth
//! endpoints, and `types` the DTOs exchanged with the backend.

pub mod api;
pub mod http;
pub mod types;
