//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `storage` abstracts durable key/value persistence; `session` builds the
//! auth session on top of it.

pub mod session;
pub mod storage;
