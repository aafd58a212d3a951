//! Copy text to the system clipboard through the page's `navigator.clipboard`.

use dioxus::prelude::*;

pub async fn copy_text(text: &str) -> Result<(), String> {
    let literal = serde_json::to_string(text).map_err(|e| e.to_string())?;
    let script = format!("await navigator.clipboard.writeText({literal}); return true;");
    document::eval(&script)
        .join::<bool>()
        .await
        .map(|_| ())
        .map_err(|e| format!("{e:?}"))
}
