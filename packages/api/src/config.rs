//! Client configuration: backend location and upload limits.

/// Largest file the uploader will send (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// MIME types accepted by the uploader. `image/jpg` is a non-standard alias
/// some browsers still report, and the backend accepts it.
pub const DEFAULT_ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Size of the body chunks handed to the transport during upload.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Configuration for [`crate::ApiClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Origin of the REST backend, without a trailing slash.
    pub base_url: String,
    pub max_upload_bytes: u64,
    pub allowed_mime_types: Vec<String>,
    pub chunk_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ApiConfig {
    /// Create a config pointing at `base_url` with the default upload limits.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|m| m.to_string())
                .collect(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Builder method to override the upload size limit.
    pub fn with_max_upload_bytes(mut self, bytes: u64) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Builder method to override the upload chunk size.
    pub fn with_chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size = bytes.max(1);
        self
    }

    /// Load config from environment variables.
    ///
    /// Reads `IMAGE_HOST_API_URL` and `IMAGE_HOST_MAX_UPLOAD_BYTES`, after
    /// loading a `.env` file if one is present.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let base_url =
            std::env::var("IMAGE_HOST_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(base_url);

        if let Ok(raw) = std::env::var("IMAGE_HOST_MAX_UPLOAD_BYTES") {
            match raw.parse::<u64>() {
                Ok(bytes) => config.max_upload_bytes = bytes,
                Err(e) => tracing::warn!("Ignoring IMAGE_HOST_MAX_UPLOAD_BYTES={raw}: {e}"),
            }
        }
        config
    }

    /// In the browser the backend shares the page origin.
    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Self {
        let origin = web_sys::window()
            .and_then(|window| window.location().origin().ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(origin)
    }

    /// Absolute URL for an API path such as `/api/auth/me`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
