//! Layouts that only mount their child routes when the session allows it.

use api::{decide, GuardOutcome, GuardPolicy};
use dioxus::prelude::*;
use ui::use_auth;

use crate::Route;

/// Signed-in non-admin users only.
#[component]
pub fn UserOnly() -> Element {
    rsx! {
        Guarded { policy: GuardPolicy::RequireUser }
    }
}

/// Admins only.
#[component]
pub fn AdminOnly() -> Element {
    rsx! {
        Guarded { policy: GuardPolicy::RequireAdmin }
    }
}

#[component]
fn Guarded(policy: GuardPolicy) -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    use_effect(move || match decide(&auth(), policy) {
        GuardOutcome::RedirectLogin => {
            nav.replace(Route::Login {});
        }
        GuardOutcome::RedirectUnauthorized => {
            nav.replace(Route::Unauthorized {});
        }
        GuardOutcome::Loading | GuardOutcome::Render => {}
    });

    match decide(&auth(), policy) {
        GuardOutcome::Render => rsx! {
            Outlet::<Route> {}
        },
        GuardOutcome::Loading => rsx! {
            div { class: "page-loading", "Loading..." }
        },
        GuardOutcome::RedirectLogin | GuardOutcome::RedirectUnauthorized => rsx! {},
    }
}
