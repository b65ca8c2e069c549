//! Declarative route table and path resolution.
//!
//! SYSTEM CONTEXT
//! ==============
//! The navigation guard never looks routes up by itself: every navigation is
//! first resolved here into a [`MatchedRoute`], the ordered root-to-leaf chain
//! of descriptors that matched the path. Auth requirements declared on a
//! layout reach its children through that chain.
//!
//! DESIGN
//! ======
//! Matching follows browser-router conventions: case-insensitive, trailing
//! slash optional, query and fragment ignored, leaf-most match wins. Child
//! paths are relative to their parent unless they start with `/`.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use crate::state::session::UserType;

/// Per-route metadata consulted by the guard and the layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub user_type: Option<UserType>,
    pub title: Option<&'static str>,
}

impl RouteMeta {
    pub const fn public() -> Self {
        Self { requires_auth: false, user_type: None, title: None }
    }

    pub const fn protected(user_type: UserType) -> Self {
        Self { requires_auth: true, user_type: Some(user_type), title: None }
    }

    pub const fn titled(title: &'static str) -> Self {
        Self { requires_auth: false, user_type: None, title: Some(title) }
    }
}

/// A node of the route tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub name: Option<&'static str>,
    pub meta: RouteMeta,
    pub redirect: Option<&'static str>,
    pub children: Vec<RouteDescriptor>,
}

impl RouteDescriptor {
    pub fn new(path: &'static str) -> Self {
        Self {
            path,
            name: None,
            meta: RouteMeta::default(),
            redirect: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    #[must_use]
    pub fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    #[must_use]
    pub fn redirect_to(mut self, path: &'static str) -> Self {
        self.redirect = Some(path);
        self
    }

    #[must_use]
    pub fn children(mut self, children: Vec<RouteDescriptor>) -> Self {
        self.children = children;
        self
    }
}

/// Entry of a layout's side menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    pub path: String,
    pub name: &'static str,
    pub title: &'static str,
}

/// The resolved target of a navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchedRoute<'a> {
    path: String,
    requested: String,
    chain: Vec<&'a RouteDescriptor>,
}

impl<'a> MatchedRoute<'a> {
    /// Normalized path that was resolved.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path as requested, without query or fragment. Trailing slashes and
    /// letter case are kept.
    pub fn requested_path(&self) -> &str {
        &self.requested
    }

    /// Matched descriptors, root first. Empty when nothing matched.
    pub fn chain(&self) -> &[&'a RouteDescriptor] {
        &self.chain
    }

    pub fn is_match(&self) -> bool {
        !self.chain.is_empty()
    }

    pub fn leaf(&self) -> Option<&'a RouteDescriptor> {
        self.chain.last().copied()
    }

    pub fn name(&self) -> Option<&'static str> {
        self.leaf().and_then(|route| route.name)
    }

    /// True if any descriptor in the chain requires authentication.
    pub fn requires_auth(&self) -> bool {
        self.chain.iter().any(|route| route.meta.requires_auth)
    }

    /// First `user_type` declared along the chain, scanning root to leaf.
    pub fn required_user_type(&self) -> Option<UserType> {
        self.chain.iter().find_map(|route| route.meta.user_type)
    }

    /// Leaf-most title along the chain.
    pub fn title(&self) -> Option<&'static str> {
        self.chain.iter().rev().find_map(|route| route.meta.title)
    }

    /// Route-level redirect declared on the leaf.
    pub fn redirect(&self) -> Option<&'static str> {
        self.leaf().and_then(|route| route.redirect)
    }
}

/// Ordered set of top-level route descriptors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDescriptor>) -> Self {
        Self { routes }
    }

    /// The dashboard's route tree.
    pub fn dashboard() -> Self {
        Self::new(vec![
            RouteDescriptor::new("/").redirect_to("/login"),
            RouteDescriptor::new("/login").named("login").meta(RouteMeta::public()),
            RouteDescriptor::new("/register").named("register").meta(RouteMeta::public()),
            RouteDescriptor::new("/user")
                .named("userLayout")
                .meta(RouteMeta::protected(UserType::Regular))
                .children(vec![
                    section("dashboard", "userDashboard", "仪表盘"),
                    section("realtime", "realtime", "实时空气质量"),
                    section("forecast", "forecast", "空气质量预报"),
                    section("history", "history", "历史数据查询"),
                    section("trends", "trends", "近期趋势分析"),
                    section("compare", "compare", "城市数据对比"),
                    section("subscriptions", "subscriptions", "订阅管理"),
                    section("alerts", "alerts", "警报查看"),
                    section("map", "map", "空气质量地图"),
                ]),
            RouteDescriptor::new("/admin")
                .named("adminLayout")
                .meta(RouteMeta::protected(UserType::Admin))
                .children(vec![
                    section("dashboard", "adminDashboard", "管理员仪表盘"),
                    section("users", "users", "用户管理"),
                    section("locations", "locations", "位置管理"),
                    section("notifications", "notifications", "通知管理"),
                ]),
        ])
    }

    /// Resolve `path` to its matched chain.
    pub fn resolve(&self, path: &str) -> MatchedRoute<'_> {
        let requested = strip_query(path);
        let path = normalize_path(path);
        let mut chain = Vec::new();
        for route in &self.routes {
            if match_route(route, "", &path, &mut chain) {
                break;
            }
        }
        MatchedRoute { path, requested, chain }
    }

    /// Full path of the route registered under `name`.
    pub fn path_for_name(&self, name: &str) -> Option<String> {
        let mut stack: Vec<(String, &RouteDescriptor)> =
            self.routes.iter().rev().map(|r| (join_path("", r.path), r)).collect();
        while let Some((full, route)) = stack.pop() {
            if route.name == Some(name) {
                return Some(full);
            }
            for child in route.children.iter().rev() {
                stack.push((join_path(&full, child.path), child));
            }
        }
        None
    }

    /// Titled children of the route named `layout`, in declaration order.
    pub fn menu_for(&self, layout: &str) -> Vec<MenuEntry> {
        let Some(base) = self.path_for_name(layout) else {
            return Vec::new();
        };
        let Some(parent) = self.resolve(&base).leaf() else {
            return Vec::new();
        };
        parent
            .children
            .iter()
            .filter_map(|child| {
                Some(MenuEntry {
                    path: join_path(&base, child.path),
                    name: child.name?,
                    title: child.meta.title?,
                })
            })
            .collect()
    }

    /// Title of the leaf-most titled route matching `path`.
    pub fn title_for(&self, path: &str) -> Option<&'static str> {
        self.resolve(path).title()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::dashboard()
    }
}

fn section(path: &'static str, name: &'static str, title: &'static str) -> RouteDescriptor {
    RouteDescriptor::new(path).named(name).meta(RouteMeta::titled(title))
}

fn match_route<'a>(
    route: &'a RouteDescriptor,
    parent: &str,
    path: &str,
    chain: &mut Vec<&'a RouteDescriptor>,
) -> bool {
    let full = join_path(parent, route.path);
    chain.push(route);
    for child in &route.children {
        if match_route(child, &full, path, chain) {
            return true;
        }
    }
    if full.eq_ignore_ascii_case(path) {
        return true;
    }
    chain.pop();
    false
}

/// Join a child segment onto its parent's full path.
pub fn join_path(parent: &str, segment: &str) -> String {
    if segment.starts_with('/') {
        return normalize_path(segment);
    }
    let parent = parent.trim_end_matches('/');
    if segment.is_empty() {
        return normalize_path(parent);
    }
    normalize_path(&format!("{parent}/{segment}"))
}

/// Strip query/fragment and ensure a leading slash.
pub fn strip_query(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{path}")
    }
}

/// Strip query/fragment, ensure a leading slash and drop trailing slashes.
pub fn normalize_path(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}
