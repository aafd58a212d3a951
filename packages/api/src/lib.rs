//! # API crate: typed client for the image-hosting backend
//!
//! Everything here is independent of the UI framework and compiles both
//! natively and to WASM, so the session logic, guard decisions and upload
//! progress can be tested without a browser.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | [`ApiClient`]: JSON request helper and the auth/admin endpoints |
//! | [`upload`] | Multipart upload with progress percentages and cancellation |
//! | [`session`] | [`SessionState`], the [`AuthBackend`] seam and the four auth operations |
//! | [`guard`] | Pure route-guard decision and role home routes |
//! | [`validation`] | Local image checks (type, size, emptiness) |
//! | [`models`] | Wire types (`User`, `AdminUser`, `UserImage`, `UploadResponse`) |
//! | [`config`] | Backend URL and upload limits |
//! | [`error`] | [`ApiError`] and [`ValidationError`] |

pub mod client;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod session;
pub mod upload;
pub mod validation;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{ApiError, ValidationError};
pub use guard::{decide, GuardOutcome, GuardPolicy};
pub use models::{AdminUser, Role, UploadResponse, User, UserImage};
pub use session::{AuthBackend, Session, SessionState, SessionStore};
pub use upload::{ProgressTracker, UploadHandle};
pub use validation::{normalized_mime, resolve_mime, validate_image, validate_parts, UploadFile};
