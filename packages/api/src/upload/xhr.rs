//! Multipart upload over `XMLHttpRequest`, the browser API that reports
//! upload progress.
//!
//! The request is owned by an [`InFlight`] guard. Dropping the guard before
//! the response arrives aborts the request, so aborting the upload future
//! (see [`UploadHandle::cancel`](super::UploadHandle::cancel)) also aborts
//! the transfer.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use futures::channel::oneshot;
use js_sys::{Array, Uint8Array};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Blob, BlobPropertyBag, FormData, ProgressEvent, XmlHttpRequest, XmlHttpRequestResponseType,
};

use super::{ProgressReporter, ProgressTracker};
use crate::error::ApiError;
use crate::validation::UploadFile;

/// `XMLHttpRequest.DONE`
const DONE: u16 = 4;

/// Status line and raw body of a finished request.
pub(super) struct Reply {
    pub status: u16,
    pub status_text: String,
    pub body: Vec<u8>,
}

struct InFlight {
    xhr: XmlHttpRequest,
    _on_progress: Closure<dyn FnMut(ProgressEvent)>,
    _on_loadend: Closure<dyn FnMut()>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.xhr.ready_state() != DONE {
            tracing::debug!("Aborting upload request");
            let _ = self.xhr.abort();
        }
        if let Ok(upload) = self.xhr.upload() {
            upload.set_onprogress(None);
        }
        self.xhr.set_onloadend(None);
    }
}

fn js_error(context: &str, err: JsValue) -> ApiError {
    ApiError::Network(format!("{context}: {err:?}"))
}

fn form_body(field: &str, file: UploadFile) -> Result<FormData, ApiError> {
    let UploadFile { name, mime, bytes } = file;
    let parts = Array::of1(&Uint8Array::from(bytes.as_slice()));
    let options = BlobPropertyBag::new();
    options.set_type(&mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|e| js_error("Failed to build upload body", e))?;

    let form = FormData::new().map_err(|e| js_error("Failed to build upload body", e))?;
    form.append_with_blob_and_filename(field, &blob, &name)
        .map_err(|e| js_error("Failed to build upload body", e))?;
    Ok(form)
}

/// POST `file` as the multipart field `field`, with credentials, reporting
/// `upload.onprogress` events to `reporter`.
pub(super) async fn post_form<F>(
    url: &str,
    field: &str,
    file: UploadFile,
    reporter: Arc<ProgressReporter<F>>,
) -> Result<Reply, ApiError>
where
    F: Fn(u8) + Send + Sync + 'static,
{
    let form = form_body(field, file)?;

    let xhr = XmlHttpRequest::new().map_err(|e| js_error("Failed to create request", e))?;
    xhr.open_with_async("POST", url, true)
        .map_err(|e| js_error("Failed to open request", e))?;
    xhr.set_with_credentials(true);
    xhr.set_response_type(XmlHttpRequestResponseType::Arraybuffer);

    let on_progress = Closure::<dyn FnMut(ProgressEvent)>::new(move |event: ProgressEvent| {
        if event.length_computable() {
            reporter.report(|tracker: &mut ProgressTracker| {
                tracker.observe(event.loaded() as u64, event.total() as u64)
            });
        }
    });
    xhr.upload()
        .map_err(|e| js_error("Failed to watch upload progress", e))?
        .set_onprogress(Some(on_progress.as_ref().unchecked_ref()));

    // loadend fires once for success, error and abort alike
    let (done_tx, done_rx) = oneshot::channel::<()>();
    let done_tx = Rc::new(RefCell::new(Some(done_tx)));
    let on_loadend = Closure::<dyn FnMut()>::new(move || {
        if let Some(tx) = done_tx.borrow_mut().take() {
            let _ = tx.send(());
        }
    });
    xhr.set_onloadend(Some(on_loadend.as_ref().unchecked_ref()));

    let request = InFlight {
        xhr,
        _on_progress: on_progress,
        _on_loadend: on_loadend,
    };
    request
        .xhr
        .send_with_opt_form_data(Some(&form))
        .map_err(|e| js_error("Failed to send request", e))?;

    done_rx
        .await
        .map_err(|_| ApiError::Network("Upload interrupted".to_string()))?;

    let status = request
        .xhr
        .status()
        .map_err(|e| js_error("Failed to read response", e))?;
    if status == 0 {
        return Err(ApiError::Network("No response from server".to_string()));
    }

    let status_text = request.xhr.status_text().unwrap_or_default();
    let body = match request.xhr.response() {
        Ok(value) if !value.is_null() && !value.is_undefined() => Uint8Array::new(&value).to_vec(),
        _ => Vec::new(),
    };

    Ok(Reply {
        status,
        status_text,
        body,
    })
}
