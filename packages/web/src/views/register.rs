//! Registration page view with username/password form and role select.

use api::Role;
use dioxus::prelude::*;
use ui::{use_auth, use_auth_actions};

use crate::{home_route, Route};

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 6;

/// Local form checks, run before anything is sent.
fn check_form(username: &str, password: &str, confirm: &str) -> Result<(), String> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(format!(
            "Username must be at least {MIN_USERNAME_LEN} characters"
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    if password != confirm {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}

/// Register page component.
#[component]
pub fn Register() -> Element {
    let auth = use_auth();
    let actions = use_auth_actions();
    let nav = use_navigator();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut role = use_signal(|| Role::User);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    // If already logged in, redirect to the role's home
    use_effect(move || {
        let state = auth();
        if let (false, Some(user_role)) = (state.is_loading(), state.role()) {
            nav.replace(home_route(user_role));
        }
    });

    if auth().is_authenticated() {
        return rsx! {};
    }

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        let actions = actions.clone();
        spawn(async move {
            error.set(None);

            let u = username().trim().to_string();
            let p = password();
            if let Err(msg) = check_form(&u, &p, &confirm_password()) {
                error.set(Some(msg));
                return;
            }

            loading.set(true);
            match actions.register(&u, &p, Some(role())).await {
                Ok(user) => {
                    nav.replace(home_route(user.role));
                }
                Err(e) => {
                    tracing::error!("Registration failed for {}: {}", u, e);
                    loading.set(false);
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
                h1 { class: "auth-title", "Create account" }

                form {
                    onsubmit: handle_register,
                    class: "auth-form",

                    label {
                        class: "auth-field",
                        "Username"
                        input {
                            r#type: "text",
                            required: true,
                            disabled: loading(),
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
                            disabled: loading(),
                            value: password(),
                            oninput: move |evt: FormEvent| password.set(evt.value()),
                        }
                    }

                    label {
                        class: "auth-field",
                        "Confirm password"
                        input {
                            r#type: "password",
                            required: true,
                            disabled: loading(),
                            value: confirm_password(),
                            oninput: move |evt: FormEvent| confirm_password.set(evt.value()),
                        }
                    }

                    label {
                        class: "auth-field",
                        "Account type"
                        select {
                            disabled: loading(),
                            value: role().as_str(),
                            onchange: move |evt: FormEvent| {
                                role.set(Role::parse(&evt.value()).unwrap_or_default());
                            },
                            option { value: "user", "User" }
                            option { value: "admin", "Administrator" }
                        }
                    }

                    if let Some(err) = error() {
                        div { class: "form-error", "{err}" }
                    }

                    button {
                        class: "primary-button",
                        r#type: "submit",
                        disabled: loading(),
                        if loading() { "Creating account..." } else { "Sign up" }
                    }
                }

                p {
                    class: "auth-switch",
                    "Already have an account? "
                    Link { to: Route::Login {}, "Sign in" }
                }
            }
        }
    }
}
