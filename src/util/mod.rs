//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate reactive wiring from page and component logic so
//! the decision code stays testable without a browser.

pub mod guard;
