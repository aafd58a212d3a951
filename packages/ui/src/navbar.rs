use dioxus::prelude::*;

use crate::auth::{use_auth, LogoutButton};

const UI_CSS: Asset = asset!("/assets/ui.css");

/// Top bar for signed-in users: `brand` on the left, greeting and logout on
/// the right. Renders nothing for anonymous visitors.
#[component]
pub fn Navbar(brand: Element, onlogout: Option<EventHandler<()>>) -> Element {
    let auth = use_auth();
    let state = auth();

    let Some(user) = state.user() else {
        return rsx! {
            document::Stylesheet { href: UI_CSS }
        };
    };

    rsx! {
        document::Stylesheet { href: UI_CSS }
        header {
            class: "navbar",
            div {
                class: "navbar-content",
                {brand}
                nav {
                    class: "navbar-nav",
                    span { class: "navbar-user", "Hi, {user.username}!" }
                    LogoutButton {
                        class: "navbar-logout",
                        onlogout: move |_| {
                            if let Some(handler) = onlogout {
                                handler.call(());
                            }
                        },
                    }
                }
            }
        }
    }
}
