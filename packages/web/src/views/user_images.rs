//! Admin view of one user's uploads.

use api::UserImage;
use dioxus::prelude::*;
use ui::clipboard::copy_text;
use ui::format::{format_date, format_file_size};
use ui::{notify, use_api, use_notifications, NotificationKind};

use crate::Route;

#[component]
pub fn UserImages(id: String) -> Element {
    let api = use_api();
    let nav = use_navigator();
    let mut notifications = use_notifications();
    let mut user_id = use_signal(|| id.clone());

    // Keep the signal in step when the router reuses this component
    if *user_id.peek() != id {
        user_id.set(id.clone());
    }

    let images = use_resource(move || {
        let api = api.clone();
        let id = user_id();
        async move {
            match api.user_images(&id).await {
                Ok(list) => list,
                Err(e) => {
                    tracing::error!("Loading images for {} failed: {}", id, e);
                    notify(&mut notifications, NotificationKind::Error, e.to_string());
                    Vec::new()
                }
            }
        }
    });

    rsx! {
        div {
            class: "admin-page",
            div {
                class: "admin-header",
                button {
                    class: "secondary-button",
                    onclick: move |_| {
                        nav.push(Route::AdminUsers {});
                    },
                    "Back to users"
                }
                h1 { class: "page-title", "Images" }
            }

            match images() {
                None => rsx! {
                    div { class: "page-loading", "Loading images..." }
                },
                Some(list) if list.is_empty() => rsx! {
                    p { class: "empty-state", "This user has not uploaded any images." }
                },
                Some(list) => rsx! {
                    div {
                        class: "image-grid",
                        for image in list {
                            ImageCard { key: "{image.id}", image }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn ImageCard(image: UserImage) -> Element {
    let mut notifications = use_notifications();
    let url = image.url.clone();

    let copy_link = move |_| {
        let url = url.clone();
        async move {
            match copy_text(&url).await {
                Ok(()) => notify(&mut notifications, NotificationKind::Success, "Link copied to clipboard"),
                Err(e) => {
                    tracing::error!("Copy failed: {}", e);
                    notify(&mut notifications, NotificationKind::Error, "Could not copy the link");
                }
            }
        }
    };

    rsx! {
        div {
            class: "image-card",
            a {
                href: "{image.url}",
                target: "_blank",
                rel: "noopener noreferrer",
                img { class: "image-thumb", src: "{image.url}", alt: "{image.original_name}" }
            }
            div {
                class: "image-info",
                p { class: "image-name", title: "{image.file_name}", "{image.original_name}" }
                p {
                    class: "image-meta",
                    "{format_file_size(image.size)} · {format_date(&image.created_at)}"
                }
                div {
                    class: "link-row",
                    input { class: "link-input", r#type: "text", readonly: true, value: "{image.url}" }
                    button { class: "copy-button", onclick: copy_link, "Copy" }
                }
            }
        }
    }
}
