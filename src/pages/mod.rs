//! Route-level page components.

pub mod layout;
pub mod login;
pub mod register;
pub mod section;
