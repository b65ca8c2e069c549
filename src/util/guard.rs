//! Reactive installation of the navigation guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Leptos has no global before-each hook, so the guard runs as an effect that
//! tracks the current pathname and the session. Any change to either re-runs
//! the full resolver; a differing final path is applied as a `replace`
//! navigation, which re-triggers the effect on the new location.
//!
//! A navigation the resolver cannot settle (redirect loop, unknown redirect
//! target) never stays on the requested page: the session is cleared and the
//! browser is sent to the login route. Layouts additionally render only while
//! [`guard_action`] reports [`GuardAction::Stay`] for the current path.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::router::guard::{LOGIN_PATH, LOGIN_ROUTE};
use crate::router::navigation::navigate;
use crate::router::routes::RouteTable;
use crate::state::session::{BrowserSessionStore, Session};

/// What the browser should do about the current location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardAction {
    /// The location is allowed as-is.
    Stay,
    /// Replace the location with this path.
    Redirect(String),
    /// Clear the session and replace the location with this login path.
    SignOut(String),
}

/// Resolve `current_path` for `session` into a browser action.
pub fn guard_action(table: &RouteTable, current_path: &str, session: &Session) -> GuardAction {
    match navigate(table, current_path, session) {
        Ok(nav) if nav.redirected() => GuardAction::Redirect(nav.final_path().to_owned()),
        Ok(_) => GuardAction::Stay,
        Err(err) => {
            log::warn!("navigation to {current_path} rejected, signing out: {err}");
            GuardAction::SignOut(
                table
                    .path_for_name(LOGIN_ROUTE)
                    .unwrap_or_else(|| LOGIN_PATH.to_owned()),
            )
        }
    }
}

/// Re-evaluate the guard whenever `pathname` or `session` changes.
///
/// Does nothing while the session is still loading.
pub fn install_navigation_guard<F>(
    table: RouteTable,
    session: RwSignal<BrowserSessionStore>,
    pathname: Memo<String>,
    navigate_to: F,
) where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let path = pathname.get();
        let action = session.with(|store| {
            (!store.is_loading()).then(|| guard_action(&table, &path, store.session()))
        });
        let replace = NavigateOptions {
            replace: true,
            ..NavigateOptions::default()
        };
        match action {
            None | Some(GuardAction::Stay) => {}
            Some(GuardAction::Redirect(target)) => navigate_to(&target, replace),
            Some(GuardAction::SignOut(login)) => {
                session.update(BrowserSessionStore::logout);
                navigate_to(&login, replace);
            }
        }
    });
}
