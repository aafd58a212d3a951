//! Image uploader: pick or drop a file, preview it, upload with a progress
//! bar, then show the shareable link.

use std::cell::RefCell;
use std::rc::Rc;

use api::{resolve_mime, validate_image, validate_parts, ApiConfig, UploadFile, UploadHandle, UploadResponse};
use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use futures::StreamExt;
use ui::clipboard::copy_text;
use ui::format::{data_url, format_file_size};
use ui::{notify, use_api, use_notifications, NotificationKind, ProgressBar};

const ACCEPT: &str = "image/jpeg,image/jpg,image/png,image/gif,image/webp";

#[derive(Clone, PartialEq)]
struct SelectedImage {
    file: UploadFile,
    preview: String,
}

/// Read and check a picked file. Metadata is checked before the bytes are
/// read so an oversized file is never loaded.
async fn read_selection(data: FileData, config: &ApiConfig) -> Result<SelectedImage, String> {
    let name = data.name();
    let mime = resolve_mime(&name, data.content_type());
    validate_parts(&mime, data.size(), config).map_err(|e| e.to_string())?;

    let bytes = data
        .read_bytes()
        .await
        .map_err(|e| format!("Could not read {name}: {e}"))?;
    let file = UploadFile::new(name, mime, bytes.to_vec());
    validate_image(&file, config).map_err(|e| e.to_string())?;

    Ok(SelectedImage {
        preview: data_url(&file.mime, &file.bytes),
        file,
    })
}

#[component]
pub fn Upload() -> Element {
    let api = use_api();
    let mut notifications = use_notifications();
    let mut selected = use_signal(|| Option::<SelectedImage>::None);
    let mut progress = use_signal(|| Option::<u8>::None);
    let mut error = use_signal(|| Option::<String>::None);
    let mut uploading = use_signal(|| false);
    let mut dragging = use_signal(|| false);
    let mut uploaded = use_signal(|| Option::<UploadResponse>::None);
    let in_flight: Rc<RefCell<Option<UploadHandle>>> = use_hook(|| Rc::new(RefCell::new(None)));

    // Leaving the page cancels a running upload
    {
        let in_flight = in_flight.clone();
        use_drop(move || {
            if let Some(handle) = in_flight.borrow_mut().take() {
                handle.cancel();
            }
        });
    }

    let config = api.config().clone();
    let select_file = use_callback(move |data: FileData| {
        let config = config.clone();
        spawn(async move {
            error.set(None);
            match read_selection(data, &config).await {
                Ok(image) => selected.set(Some(image)),
                Err(msg) => {
                    selected.set(None);
                    error.set(Some(msg));
                }
            }
        });
    });

    let start_upload = {
        let in_flight = in_flight.clone();
        move |_| {
            let Some(image) = selected() else {
                return;
            };
            error.set(None);
            uploading.set(true);
            progress.set(Some(0));

            let (tx, mut rx) = futures::channel::mpsc::unbounded::<u8>();
            let (handle, upload) = api.start_upload(image.file, move |percent| {
                let _ = tx.unbounded_send(percent);
            });
            *in_flight.borrow_mut() = Some(handle);

            spawn(async move {
                while let Some(percent) = rx.next().await {
                    if *uploading.peek() {
                        progress.set(Some(percent));
                    }
                }
            });

            let in_flight = in_flight.clone();
            spawn(async move {
                let outcome = upload.await;
                in_flight.borrow_mut().take();
                uploading.set(false);
                progress.set(None);

                match outcome {
                    Ok(response) => {
                        tracing::info!("Uploaded {} -> {}", response.filename, response.url);
                        notify(&mut notifications, NotificationKind::Success, "Image uploaded");
                        selected.set(None);
                        uploaded.set(Some(response));
                    }
                    Err(e) if e.is_aborted() => {
                        tracing::debug!("Upload aborted");
                    }
                    Err(e) => {
                        tracing::error!("Upload failed: {}", e);
                        notify(&mut notifications, NotificationKind::Error, e.to_string());
                        error.set(Some(e.to_string()));
                    }
                }
            });
        }
    };

    let cancel_upload = {
        let in_flight = in_flight.clone();
        move |_| {
            if let Some(handle) = in_flight.borrow().as_ref() {
                handle.cancel();
            }
        }
    };

    if let Some(response) = uploaded() {
        return rsx! {
            UploadResult {
                response,
                onreset: move |_| uploaded.set(None),
            }
        };
    }

    rsx! {
        div {
            class: "uploader",
            h1 { class: "page-title", "Upload an image" }

            if let Some(image) = selected() {
                div {
                    class: "preview",
                    img { class: "preview-image", src: "{image.preview}", alt: "Preview" }
                    p {
                        class: "preview-meta",
                        "{image.file.name} · {format_file_size(image.file.size())}"
                    }
                    if !uploading() {
                        button {
                            class: "secondary-button",
                            onclick: move |_| {
                                selected.set(None);
                                error.set(None);
                            },
                            "Choose another image"
                        }
                    }
                }
            } else {
                label {
                    class: if dragging() { "drop-zone dragover" } else { "drop-zone" },
                    ondragover: move |evt: DragEvent| {
                        evt.prevent_default();
                        dragging.set(true);
                    },
                    ondragleave: move |_| dragging.set(false),
                    ondrop: move |evt: DragEvent| {
                        evt.prevent_default();
                        dragging.set(false);
                        if let Some(data) = evt.files().into_iter().next() {
                            select_file.call(data);
                        }
                    },
                    div { class: "drop-icon", "+" }
                    p { "Drag an image here" }
                    span { class: "secondary-button", "Choose from device" }
                    input {
                        class: "file-input",
                        r#type: "file",
                        accept: ACCEPT,
                        onchange: move |evt: FormEvent| {
                            if let Some(data) = evt.files().into_iter().next() {
                                select_file.call(data);
                            }
                        },
                    }
                }
            }

            if let Some(msg) = error() {
                div { class: "form-error", "{msg}" }
            }

            if let Some(percent) = progress() {
                ProgressBar { progress: percent }
            }

            if selected().is_some() {
                if uploading() {
                    button {
                        class: "secondary-button",
                        onclick: cancel_upload,
                        "Cancel"
                    }
                } else {
                    button {
                        class: "primary-button",
                        onclick: start_upload,
                        "Upload image"
                    }
                }
            }
        }
    }
}

/// Shown after a successful upload: the image, its link and a copy button.
#[component]
fn UploadResult(response: UploadResponse, onreset: EventHandler<()>) -> Element {
    let mut notifications = use_notifications();
    let mut copied = use_signal(|| false);
    let url = response.url.clone();

    let copy_link = move |_| {
        let url = url.clone();
        async move {
            match copy_text(&url).await {
                Ok(()) => {
                    copied.set(true);
                    notify(&mut notifications, NotificationKind::Success, "Link copied to clipboard");
                }
                Err(e) => {
                    tracing::error!("Copy failed: {}", e);
                    notify(&mut notifications, NotificationKind::Error, "Could not copy the link");
                }
            }
        }
    };

    rsx! {
        div {
            class: "upload-result",
            h1 { class: "page-title", "Image uploaded!" }
            img { class: "result-image", src: "{response.url}", alt: "{response.filename}" }
            div {
                class: "link-row",
                input { class: "link-input", r#type: "text", readonly: true, value: "{response.url}" }
                button {
                    class: if copied() { "copy-button copied" } else { "copy-button" },
                    onclick: copy_link,
                    if copied() { "Copied" } else { "Copy" }
                }
            }
            button {
                class: "secondary-button",
                onclick: move |_| onreset.call(()),
                "Upload another image"
            }
        }
    }
}
