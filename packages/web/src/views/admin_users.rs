//! Admin table of every account with its image count.

use api::{AdminUser, Role};
use dioxus::prelude::*;
use ui::format::format_date;
use ui::{notify, use_api, use_notifications, NotificationKind};

use crate::Route;

#[component]
pub fn AdminUsers() -> Element {
    let api = use_api();
    let mut notifications = use_notifications();

    let users = use_resource(move || {
        let api = api.clone();
        async move {
            match api.admin_users().await {
                Ok(list) => list,
                Err(e) => {
                    tracing::error!("Loading users failed: {}", e);
                    notify(&mut notifications, NotificationKind::Error, e.to_string());
                    Vec::new()
                }
            }
        }
    });

    let Some(list) = users() else {
        return rsx! {
            div { class: "page-loading", "Loading users..." }
        };
    };

    rsx! {
        div {
            class: "admin-page",
            div {
                class: "admin-header",
                h1 { class: "page-title", "Users" }
                span { class: "admin-count", "{list.len()} total" }
            }

            if list.is_empty() {
                p { class: "empty-state", "No users found." }
            } else {
                table {
                    class: "data-table",
                    thead {
                        tr {
                            th { "ID" }
                            th { "Username" }
                            th { "Role" }
                            th { "Images" }
                            th { "Registered" }
                            th {}
                        }
                    }
                    tbody {
                        for user in list {
                            UserRow { key: "{user.id}", user }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn UserRow(user: AdminUser) -> Element {
    let nav = use_navigator();
    let id = user.id.clone();

    rsx! {
        tr {
            td { class: "mono", title: "{user.id}", "{user.short_id()}..." }
            td { "{user.username}" }
            td {
                span {
                    class: match user.role {
                        Role::Admin => "role-badge admin",
                        Role::User => "role-badge user",
                    },
                    "{user.role}"
                }
            }
            td { "{user.image_count}" }
            td { "{format_date(&user.created_at)}" }
            td {
                button {
                    class: "secondary-button",
                    onclick: move |_| {
                        nav.push(Route::UserImages { id: id.clone() });
                    },
                    "View images"
                }
            }
        }
    }
}
