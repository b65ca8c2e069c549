//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{ParentRoute, Redirect, Route, Router, Routes},
    hooks::{use_location, use_navigate},
};

use crate::net::http::{ApiClient, ApiConfig};
use crate::pages::{
    layout::{AdminLayout, UserLayout},
    login::LoginPage,
    register::RegisterPage,
    section::SectionPage,
};
use crate::router::routes::RouteTable;
use crate::state::session::BrowserSessionStore;
use crate::state::storage::LocalStorage;
use crate::util::guard::install_navigation_guard;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="zh-CN">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the session, API client, and route table as context and mounts
/// the guarded router.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    // Server rendering has no localStorage: start pending and read the durable
    // session once mounted in the browser, so SSR and hydration agree.
    let session = RwSignal::new(BrowserSessionStore::pending(LocalStorage));
    Effect::new(move || session.update(BrowserSessionStore::reload));
    provide_context(session);
    provide_context(ApiClient::new(ApiConfig::from_build_env(), session));
    provide_context(RouteTable::dashboard());

    view! {
        <Stylesheet id="leptos" href="/pkg/airwatch.css"/>
        <Title text="Air Quality Monitoring"/>

        <Router>
            <NavigationGuard/>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=|| view! { <Redirect path="/login"/> }/>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("register") view=RegisterPage/>
                <ParentRoute path=StaticSegment("user") view=UserLayout>
                    <Route path=StaticSegment("") view=|| ()/>
                    <Route path=StaticSegment("dashboard") view=SectionPage/>
                    <Route path=StaticSegment("realtime") view=SectionPage/>
                    <Route path=StaticSegment("forecast") view=SectionPage/>
                    <Route path=StaticSegment("history") view=SectionPage/>
                    <Route path=StaticSegment("trends") view=SectionPage/>
                    <Route path=StaticSegment("compare") view=SectionPage/>
                    <Route path=StaticSegment("subscriptions") view=SectionPage/>
                    <Route path=StaticSegment("alerts") view=SectionPage/>
                    <Route path=StaticSegment("map") view=SectionPage/>
                </ParentRoute>
                <ParentRoute path=StaticSegment("admin") view=AdminLayout>
                    <Route path=StaticSegment("") view=|| ()/>
                    <Route path=StaticSegment("dashboard") view=SectionPage/>
                    <Route path=StaticSegment("users") view=SectionPage/>
                    <Route path=StaticSegment("locations") view=SectionPage/>
                    <Route path=StaticSegment("notifications") view=SectionPage/>
                </ParentRoute>
            </Routes>
        </Router>
    }
}

/// Runs the navigation guard for every location inside the router.
#[component]
fn NavigationGuard() -> impl IntoView {
    let session = expect_context::<RwSignal<BrowserSessionStore>>();
    let table = expect_context::<RouteTable>();
    let location = use_location();
    install_navigation_guard(table, session, location.pathname, use_navigate());
}
