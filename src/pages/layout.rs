//! Signed-in layouts for the user and admin areas.
//!
//! SYSTEM CONTEXT
//! ==============
//! Both layouts render the same chrome: a side menu built from the route
//! table's children, the current user, a logout button, and the section
//! outlet. Nothing is rendered until the browser session has loaded and the
//! guard allows the current path, so server-rendered HTML never contains
//! signed-in chrome and a rejected session never mounts a protected section.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::{A, Outlet};
use leptos_router::hooks::{use_location, use_navigate};

use crate::router::guard::{LOGIN_PATH, LOGIN_ROUTE};
use crate::router::routes::RouteTable;
use crate::state::session::BrowserSessionStore;
use crate::util::guard::{GuardAction, guard_action};

#[component]
pub fn UserLayout() -> impl IntoView {
    view! { <DashboardLayout layout="userLayout" heading="Air Quality"/> }
}

#[component]
pub fn AdminLayout() -> impl IntoView {
    view! { <DashboardLayout layout="adminLayout" heading="Administration"/> }
}

/// Guarded layout for the route named `layout`.
#[component]
pub fn DashboardLayout(layout: &'static str, heading: &'static str) -> impl IntoView {
    let session = expect_context::<RwSignal<BrowserSessionStore>>();
    let table = expect_context::<RouteTable>();
    let location = use_location();

    let allowed = move || {
        let path = location.pathname.get();
        session.with(|store| {
            !store.is_loading() && guard_action(&table, &path, store.session()) == GuardAction::Stay
        })
    };

    view! {
        <Show
            when=allowed
            fallback=|| view! { <p class="dashboard-layout__pending">"Loading..."</p> }
        >
            <DashboardChrome layout=layout heading=heading/>
        </Show>
    }
}

#[component]
fn DashboardChrome(layout: &'static str, heading: &'static str) -> impl IntoView {
    let session = expect_context::<RwSignal<BrowserSessionStore>>();
    let table = expect_context::<RouteTable>();
    let navigate = use_navigate();

    let menu = table.menu_for(layout);
    let login_path = table
        .path_for_name(LOGIN_ROUTE)
        .unwrap_or_else(|| LOGIN_PATH.to_owned());

    let display_name = move || {
        session.with(|store| {
            store
                .current_user()
                .display_name()
                .map_or_else(|| "Signed in".to_owned(), str::to_owned)
        })
    };

    let on_logout = move |_| {
        session.update(|store| store.logout());
        navigate(&login_path, NavigateOptions::default());
    };

    view! {
        <div class="dashboard-layout">
            <aside class="dashboard-layout__menu">
                <h2 class="dashboard-layout__heading">{heading}</h2>
                <nav>
                    {menu
                        .into_iter()
                        .map(|entry| {
                            view! {
                                <A href=entry.path attr:class="dashboard-layout__link">
                                    {entry.title}
                                </A>
                            }
                        })
                        .collect_view()}
                </nav>
            </aside>
            <main class="dashboard-layout__main">
                <header class="dashboard-layout__header">
                    <span class="dashboard-layout__user">{display_name}</span>
                    <button class="dashboard-layout__logout" on:click=on_logout>
                        "Log out"
                    </button>
                </header>
                <Outlet/>
            </main>
        </div>
    }
}
