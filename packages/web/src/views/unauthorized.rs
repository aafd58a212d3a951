use dioxus::prelude::*;
use ui::{use_auth, LogoutButton};

use crate::{home_route, Route};

/// Shown when a signed-in user opens a page their role may not see.
#[component]
pub fn Unauthorized() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let home = auth().role().map(home_route).unwrap_or(Route::Login {});

    rsx! {
        div {
            class: "auth-container",
            div {
                class: "auth-card unauthorized",
                h1 { class: "auth-title", "Access denied" }
                p { "You do not have permission to view this page." }
                div {
                    class: "unauthorized-actions",
                    Link { class: "primary-button", to: home, "Go home" }
                    if auth().is_authenticated() {
                        LogoutButton {
                            class: "secondary-button",
                            label: "Sign in as someone else",
                            onlogout: move |_| {
                                nav.replace(Route::Login {});
                            },
                        }
                    }
                }
            }
        }
    }
}
