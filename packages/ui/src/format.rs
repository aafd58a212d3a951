//! Display helpers shared by the pages.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// `1536` -> `"1.5 KB"`. Two decimals at most, trailing zeros dropped.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    let mut scale = 1u64;
    while unit + 1 < SIZE_UNITS.len() && bytes >= scale * 1024 {
        scale *= 1024;
        unit += 1;
    }
    let value = (bytes as f64 / scale as f64 * 100.0).round() / 100.0;
    format!("{} {}", value, SIZE_UNITS[unit])
}

/// `dd.mm.yyyy`
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%d.%m.%Y").to_string()
}

/// Inline `data:` URL used to preview a picked image before it is uploaded.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}
