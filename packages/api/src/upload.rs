//! # Image upload with progress and cancellation
//!
//! [`ApiClient::start_upload`] validates the file locally, then streams it as
//! multipart form data (field `image`) to `POST /api/upload`. It returns an
//! [`UploadHandle`] and a future that settles with the [`UploadResponse`].
//!
//! Progress is reported as integer percentages computed by
//! [`ProgressTracker`]: `floor(sent / total * 100)`, starting at `0`, strictly
//! increasing, never above `100`. Calling [`UploadHandle::cancel`] stops all
//! further progress callbacks and makes the future resolve with
//! [`ApiError::Aborted`].
//!
//! In native builds the body is a chunked stream, so percentages follow the
//! bytes handed to the transport. `fetch` exposes no upload progress, so WASM
//! builds send the form through `XMLHttpRequest` (see [`xhr`]) and follow its
//! `upload.onprogress` events; cancelling aborts that request.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::{AbortHandle, Abortable};
#[cfg(not(target_arch = "wasm32"))]
use reqwest::multipart::{Form, Part};

use crate::client::ApiClient;
use crate::error::ApiError;
#[cfg(not(target_arch = "wasm32"))]
use crate::error::ValidationError;
use crate::models::UploadResponse;
use crate::validation::{normalized_mime, validate_image, UploadFile};

#[cfg(target_arch = "wasm32")]
mod xhr;

const UPLOAD_PATH: &str = "/api/upload";
const IMAGE_FIELD: &str = "image";

/// Turns byte counts into monotonically increasing percentages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressTracker {
    total: u64,
    sent: u64,
    last: Option<u8>,
}

impl ProgressTracker {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            sent: 0,
            last: None,
        }
    }

    /// Initial `0`, emitted once.
    pub fn start(&mut self) -> Option<u8> {
        self.emit(0)
    }

    /// Record `bytes` more sent. Returns the new percentage only if it grew.
    /// With an unknown (zero) total nothing is reported.
    pub fn advance(&mut self, bytes: u64) -> Option<u8> {
        self.sent = self.sent.saturating_add(bytes);
        let percent = self.percent()?;
        self.emit(percent)
    }

    /// Record an absolute byte count against a total reported by the
    /// transport, which may differ from the file size (multipart framing).
    pub fn observe(&mut self, sent: u64, total: u64) -> Option<u8> {
        if total == 0 {
            return None;
        }
        self.total = total;
        self.sent = sent;
        let percent = self.percent()?;
        self.emit(percent)
    }

    /// Final `100` if it has not been reported yet.
    pub fn finish(&mut self) -> Option<u8> {
        self.emit(100)
    }

    pub fn last(&self) -> Option<u8> {
        self.last
    }

    fn percent(&self) -> Option<u8> {
        if self.total == 0 {
            return None;
        }
        let sent = self.sent.min(self.total) as u128;
        Some((sent * 100 / self.total as u128) as u8)
    }

    fn emit(&mut self, percent: u8) -> Option<u8> {
        let percent = percent.min(100);
        match self.last {
            Some(last) if percent <= last => None,
            _ => {
                self.last = Some(percent);
                Some(percent)
            }
        }
    }
}

/// Cancels an in-flight upload.
#[derive(Debug, Clone)]
pub struct UploadHandle {
    abort: AbortHandle,
    cancelled: Arc<AtomicBool>,
}

impl UploadHandle {
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            tracing::debug!("Upload cancelled");
        }
        self.abort.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Shared between the body stream and the request future.
struct ProgressReporter<F> {
    tracker: Mutex<ProgressTracker>,
    cancelled: Arc<AtomicBool>,
    on_progress: F,
}

impl<F: Fn(u8)> ProgressReporter<F> {
    fn report(&self, step: impl FnOnce(&mut ProgressTracker) -> Option<u8>) {
        if self.cancelled.load(Ordering::SeqCst) {
            return;
        }
        let percent = match self.tracker.lock() {
            Ok(mut tracker) => step(&mut tracker),
            Err(poisoned) => step(&mut poisoned.into_inner()),
        };
        if let Some(percent) = percent {
            (self.on_progress)(percent);
        }
    }
}

impl ApiClient {
    /// Start uploading `file`, calling `on_progress` with percentages as the
    /// body is sent.
    ///
    /// Validation runs before anything touches the network: an invalid file
    /// settles the future with [`ApiError::Validation`] and no request is made.
    pub fn start_upload<F>(
        &self,
        file: UploadFile,
        on_progress: F,
    ) -> (UploadHandle, impl Future<Output = Result<UploadResponse, ApiError>> + 'static)
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        let (abort, registration) = AbortHandle::new_pair();
        let cancelled = Arc::new(AtomicBool::new(false));
        let handle = UploadHandle {
            abort,
            cancelled: cancelled.clone(),
        };

        let reporter = Arc::new(ProgressReporter {
            tracker: Mutex::new(ProgressTracker::new(file.size())),
            cancelled,
            on_progress,
        });
        let client = self.clone();
        let task = Abortable::new(client.upload_inner(file, reporter), registration);

        let future = async move {
            match task.await {
                Ok(result) => result,
                Err(_aborted) => Err(ApiError::Aborted),
            }
        };
        (handle, future)
    }

    /// Upload without a cancel handle.
    pub async fn upload<F>(&self, file: UploadFile, on_progress: F) -> Result<UploadResponse, ApiError>
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        let (_handle, future) = self.start_upload(file, on_progress);
        future.await
    }

    async fn upload_inner<F>(
        self,
        file: UploadFile,
        reporter: Arc<ProgressReporter<F>>,
    ) -> Result<UploadResponse, ApiError>
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        if let Err(e) = validate_image(&file, self.config()) {
            tracing::debug!("Rejected {} before upload: {e}", file.name);
            return Err(e.into());
        }

        tracing::debug!("Uploading {} ({} bytes)", file.name, file.size());
        reporter.report(ProgressTracker::start);

        let response = self.send_image(file, reporter.clone()).await?;

        reporter.report(ProgressTracker::finish);
        Ok(response)
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn send_image<F>(
        &self,
        file: UploadFile,
        reporter: Arc<ProgressReporter<F>>,
    ) -> Result<UploadResponse, ApiError>
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        let part = self.image_part(file, reporter)?;
        let form = Form::new().part(IMAGE_FIELD, part);
        self.send_json(self.post(UPLOAD_PATH).multipart(form)).await
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn image_part<F>(&self, file: UploadFile, reporter: Arc<ProgressReporter<F>>) -> Result<Part, ApiError>
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        let UploadFile { name, mime, bytes } = file;
        let mime = normalized_mime(&mime);
        let total = bytes.len() as u64;
        let chunks: Vec<Vec<u8>> = bytes
            .chunks(self.config().chunk_size)
            .map(|chunk| chunk.to_vec())
            .collect();

        let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
            reporter.report(|tracker| tracker.advance(chunk.len() as u64));
            Ok::<_, std::io::Error>(chunk)
        }));

        Part::stream_with_length(reqwest::Body::wrap_stream(stream), total)
            .file_name(name)
            .mime_str(&mime)
            .map_err(|_| ApiError::Validation(ValidationError::UnsupportedType(mime)))
    }

    #[cfg(target_arch = "wasm32")]
    async fn send_image<F>(
        &self,
        file: UploadFile,
        reporter: Arc<ProgressReporter<F>>,
    ) -> Result<UploadResponse, ApiError>
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        let file = UploadFile {
            mime: normalized_mime(&file.mime),
            ..file
        };
        let reply = xhr::post_form(&self.config().url(UPLOAD_PATH), IMAGE_FIELD, file, reporter).await?;

        if !(200..300).contains(&reply.status) {
            let canonical = reqwest::StatusCode::from_u16(reply.status)
                .ok()
                .and_then(|status| status.canonical_reason());
            let reason = Some(reply.status_text.as_str())
                .filter(|text| !text.is_empty())
                .or(canonical);
            return Err(ApiError::from_response(reply.status, reason, &reply.body));
        }
        serde_json::from_slice(&reply.body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}
