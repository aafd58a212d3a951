//! Client-side checks applied to an image before it is uploaded.

use crate::config::ApiConfig;
use crate::error::ValidationError;

/// A file picked by the user, held in memory until it is uploaded.
#[derive(Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    /// MIME type reported by the browser, or guessed from the extension.
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Build from a file name alone, guessing the MIME type from the extension.
    pub fn from_name(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::with_reported_type(name, None, bytes)
    }

    /// Use the reported MIME type when there is one, else guess from the name.
    pub fn with_reported_type(name: impl Into<String>, reported: Option<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = resolve_mime(&name, reported);
        Self { name, mime, bytes }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// The browser-reported MIME type, or a guess from the file extension when
/// the browser reported nothing.
pub fn resolve_mime(name: &str, reported: Option<String>) -> String {
    match reported.filter(|m| !m.trim().is_empty()) {
        Some(mime) => mime,
        None => mime_guess::from_path(name)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string(),
    }
}

/// MIME type as sent on the wire: trimmed and lowercased.
pub fn normalized_mime(mime: &str) -> String {
    mime.trim().to_ascii_lowercase()
}

/// Check an image against the configured limits.
///
/// Emptiness is checked first, so a zero-byte file is rejected as empty
/// whatever its declared type. A file of exactly the size limit passes.
pub fn validate_image(file: &UploadFile, config: &ApiConfig) -> Result<(), ValidationError> {
    validate_parts(&file.mime, file.size(), config)
}

/// Same checks as [`validate_image`], for callers that only have metadata.
pub fn validate_parts(mime: &str, size: u64, config: &ApiConfig) -> Result<(), ValidationError> {
    if size == 0 {
        return Err(ValidationError::Empty);
    }

    let mime = normalized_mime(mime);
    if !config.allowed_mime_types.iter().any(|allowed| *allowed == mime) {
        return Err(ValidationError::UnsupportedType(if mime.is_empty() {
            "unknown".to_string()
        } else {
            mime
        }));
    }

    if size > config.max_upload_bytes {
        return Err(ValidationError::TooLarge {
            size,
            max: config.max_upload_bytes,
        });
    }

    Ok(())
}
