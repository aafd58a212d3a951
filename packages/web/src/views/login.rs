//! Login page view with username/password form.

use dioxus::prelude::*;
use ui::{use_auth, use_auth_actions};

use crate::{home_route, Route};

/// Login page component.
#[component]
pub fn Login() -> Element {
    let auth = use_auth();
    let actions = use_auth_actions();
    let nav = use_navigator();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut submitting = use_signal(|| false);

    // If already logged in, redirect to the role's home
    use_effect(move || {
        let state = auth();
        if let (false, Some(user_role)) = (state.is_loading(), state.role()) {
            nav.replace(home_route(user_role));
        }
    });

    if auth().is_loading() || auth().is_authenticated() {
        return rsx! {};
    }

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        let actions = actions.clone();
        spawn(async move {
            error.set(None);
            submitting.set(true);

            let u = username().trim().to_string();
            let p = password();
            match actions.login(&u, &p).await {
                Ok(user) => {
                    nav.replace(home_route(user.role));
                }
                Err(e) => {
                    tracing::error!("Login failed for {}: {}", u, e);
                    submitting.set(false);
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    rsx! {
        div {
            class: "auth-container",
            div {
                class: "auth-card",
                h1 { class: "auth-title", "Sign in" }

                form {
                    onsubmit: handle_login,
                    class: "auth-form",

                    label {
                        class: "auth-field",
                        "Username"
                        input {
                            r#type: "text",
                            required: true,
                            minlength: "3",
                            disabled: submitting(),
                            value: username(),
                            oninput: move |evt: FormEvent| username.set(evt.value()),
                        }
                    }

                    label {
                        class: "auth-field",
                        "Password"
                        input {
                            r#type: "password",
                            required: true,
                            minlength: "6",
                            disabled: submitting(),
                            value: password(),
                            oninput: move |evt: FormEvent| password.set(evt.value()),
                        }
                    }

                    if let Some(err) = error() {
                        div { class: "form-error", "{err}" }
                    }

                    button {
                        class: "primary-button",
                        r#type: "submit",
                        disabled: submitting(),
                        if submitting() { "Signing in..." } else { "Sign in" }
                    }
                }

                p {
                    class: "auth-switch",
                    "No account yet? "
                    Link { to: Route::Register {}, "Create one" }
                }
            }
        }
    }
}
