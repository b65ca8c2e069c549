//! Navigation resolution: route redirects, guard, and guard redirects.
//!
//! A guard redirect starts a fresh navigation, so the guard runs again on the
//! redirect target. Route-level redirects (e.g. `/` to `/login`) are applied
//! before the guard sees the route.

#[cfg(test)]
#[path = "navigation_test.rs"]
mod navigation_test;

use super::guard::{self, NavigationDecision, RedirectTarget};
use super::routes::{MatchedRoute, RouteTable, normalize_path};
use crate::state::session::Session;

/// Upper bound on hops for a single navigation.
pub const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("redirect loop detected at `{path}`")]
    RedirectLoop { path: String },
    #[error("redirect to unknown route `{name}`")]
    UnknownRoute { name: String },
}

/// Completed navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation<'a> {
    pub route: MatchedRoute<'a>,
    /// Every path visited, starting with the requested one.
    pub hops: Vec<String>,
}

impl Navigation<'_> {
    pub fn final_path(&self) -> &str {
        self.route.path()
    }

    pub fn redirected(&self) -> bool {
        self.hops.len() > 1
    }
}

/// Resolve a navigation to `path` for `session`.
///
/// # Errors
///
/// Returns [`NavigationError::RedirectLoop`] when a redirect revisits a path
/// of the same navigation or the hop limit is exceeded, and
/// [`NavigationError::UnknownRoute`] when a guard redirects to a name missing
/// from `table`.
pub fn navigate<'a>(
    table: &'a RouteTable,
    path: &str,
    session: &Session,
) -> Result<Navigation<'a>, NavigationError> {
    let mut hops = vec![normalize_path(path)];
    let mut request = path.to_owned();
    loop {
        let route = table.resolve(&request);
        let current = route.path().to_owned();

        let next = if let Some(redirect) = route.redirect() {
            normalize_path(redirect)
        } else {
            match guard::decide(&route, session) {
                NavigationDecision::Proceed => return Ok(Navigation { route, hops }),
                NavigationDecision::Redirect(target) => target_path(table, target)?,
            }
        };

        if hops.len() > MAX_REDIRECTS || hops.iter().any(|hop| hop.eq_ignore_ascii_case(&next)) {
            log::warn!("navigation aborted, redirect loop via {hops:?} -> {next}");
            return Err(NavigationError::RedirectLoop { path: next });
        }
        log::debug!("navigation redirected {current} -> {next}");
        request.clone_from(&next);
        hops.push(next);
    }
}

fn target_path(table: &RouteTable, target: RedirectTarget) -> Result<String, NavigationError> {
    match target {
        RedirectTarget::Path(path) => Ok(normalize_path(path)),
        RedirectTarget::Named(name) => table
            .path_for_name(name)
            .ok_or_else(|| NavigationError::UnknownRoute { name: name.to_owned() }),
    }
}
