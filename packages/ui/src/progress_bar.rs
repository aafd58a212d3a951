use dioxus::prelude::*;

/// Horizontal bar for an upload percentage.
#[component]
pub fn ProgressBar(progress: u8) -> Element {
    let progress = progress.min(100);

    rsx! {
        div {
            class: "progress",
            div {
                class: "progress-track",
                div {
                    class: "progress-fill",
                    style: "width: {progress}%;",
                }
            }
            span { class: "progress-label", "{progress}%" }
        }
    }
}
