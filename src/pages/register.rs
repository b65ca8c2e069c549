//! Registration page. New accounts are sent back to `/login` to sign in.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::net::http::BrowserApiClient;
use crate::net::types::RegisterRequest;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Validate the registration form.
pub fn validate_register_input(
    username: &str,
    password: &str,
    confirm: &str,
    email: &str,
) -> Result<RegisterRequest, &'static str> {
    let username = username.trim();
    if username.is_empty() {
        return Err("Enter a username.");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters.");
    }
    if password != confirm {
        return Err("Passwords do not match.");
    }
    let email = email.trim();
    if !email.is_empty() && !email.contains('@') {
        return Err("Enter a valid email address.");
    }
    Ok(RegisterRequest {
        username: username.to_owned(),
        password: password.to_owned(),
        email: (!email.is_empty()).then(|| email.to_owned()),
    })
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let client = expect_context::<BrowserApiClient>();
    let navigate = use_navigate();

    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let request = match validate_register_input(
            &username.get(),
            &password.get(),
            &confirm.get(),
            &email.get(),
        ) {
            Ok(request) => request,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Creating account...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let client = client.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::register(&client, &request).await {
                    Ok(()) => navigate("/login", leptos_router::NavigateOptions::default()),
                    Err(err) => info.set(crate::net::api::user_message(&err)),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&client, &navigate, request);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Air Quality Monitoring"</h1>
                <p class="login-card__subtitle">"Create an account"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        autocomplete="username"
                        placeholder="Username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="email"
                        placeholder="Email (optional)"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="new-password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="new-password"
                        placeholder="Confirm password"
                        prop:value=move || confirm.get()
                        on:input=move |ev| confirm.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Register"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <p class="login-card__footer">
                    "Already registered? "
                    <A href="/login">"Sign in"</A>
                </p>
            </div>
        </div>
    }
}
