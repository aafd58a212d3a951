use dioxus::prelude::*;

use api::guard::home_path;
use api::Role;
use ui::{use_auth, AuthProvider, Navbar, NotificationProvider};
use views::{AdminUsers, Login, Register, Unauthorized, Upload, UserImages};

mod guard;
mod views;

#[cfg(test)]
mod test_support;

use guard::{AdminOnly, UserOnly};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Register {},
        #[route("/login")]
        Login {},
        #[route("/unauthorized")]
        Unauthorized {},
        #[layout(UserOnly)]
            #[route("/upload")]
            Upload {},
        #[end_layout]
        #[layout(AdminOnly)]
            #[route("/admin/users")]
            AdminUsers {},
            #[route("/admin/users/:id/images")]
            UserImages { id: String },
        #[end_layout]
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

/// Landing route for a signed-in user of `role`.
fn home_route(role: Role) -> Route {
    home_path(role).parse().unwrap_or(Route::Login {})
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        NotificationProvider {
            AuthProvider {
                Router::<Route> {}
            }
        }
    }
}

/// Header plus the current page.
#[component]
fn Shell() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let home = auth().role().map(home_route).unwrap_or(Route::Login {});

    rsx! {
        Navbar {
            brand: rsx! {
                Link { class: "brand", to: home, "Image Uploader" }
            },
            onlogout: move |_| {
                nav.replace(Route::Login {});
            },
        }
        main {
            class: "page",
            Outlet::<Route> {}
        }
    }
}

/// Unknown paths go back to `/`.
#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let nav = use_navigator();

    use_effect(use_reactive!(|segments| {
        tracing::debug!("No route for /{}", segments.join("/"));
        nav.replace(Route::Register {});
    }));

    rsx! {}
}
