//! Navigation guard: allow or redirect each route transition.
//!
//! SYSTEM CONTEXT
//! ==============
//! Evaluated before every navigation against the target's matched chain and
//! the current session. Holds no state, so a login or logout between two
//! navigations is always observed.
//!
//! DECISION ORDER
//! ==============
//! 1. Protected target, no session: go to the `login` route.
//! 2. Protected target, wrong role: go to the session's own dashboard.
//! 3. Exactly `/login` while signed in: go to the session's own dashboard.
//!    `/login/` or `/LOGIN` still match the login route but are let through.
//! 4. Everything else proceeds.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use super::routes::MatchedRoute;
use crate::state::session::Session;

/// Name of the login route.
pub const LOGIN_ROUTE: &str = "login";
/// Path that signed-in sessions are bounced away from.
pub const LOGIN_PATH: &str = "/login";

/// Where a redirect sends the navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedirectTarget {
    Named(&'static str),
    Path(&'static str),
}

/// Outcome of a guard evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed,
    Redirect(RedirectTarget),
}

/// Decide whether `to` may be entered with `session`.
pub fn decide(to: &MatchedRoute<'_>, session: &Session) -> NavigationDecision {
    let authenticated = session.is_authenticated();

    if to.requires_auth() {
        if !authenticated {
            return NavigationDecision::Redirect(RedirectTarget::Named(LOGIN_ROUTE));
        }
        return match to.required_user_type() {
            Some(required) if session.user_type() != Some(required.code()) => {
                NavigationDecision::Redirect(RedirectTarget::Path(session.home_path()))
            }
            _ => NavigationDecision::Proceed,
        };
    }

    if authenticated && to.requested_path() == LOGIN_PATH {
        return NavigationDecision::Redirect(RedirectTarget::Path(session.home_path()));
    }
    NavigationDecision::Proceed
}
