//! Placeholder for dashboard sections, titled from route metadata.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::hooks::use_location;

use crate::router::routes::RouteTable;

#[component]
pub fn SectionPage() -> impl IntoView {
    let table = expect_context::<RouteTable>();
    let location = use_location();

    let title = Memo::new(move |_| {
        let path = location.pathname.get();
        table.title_for(&path).unwrap_or_default().to_owned()
    });

    view! {
        <Title text=move || title.get()/>
        <section class="dashboard-section">
            <h1 class="dashboard-section__title">{move || title.get()}</h1>
        </section>
    }
}
