//! Uploaded image models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of a successful `POST /api/upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Publicly accessible link to the stored image.
    pub url: String,
    pub id: String,
    /// Name the backend stored the object under.
    pub filename: String,
}

/// One row of `GET /api/admin/users/{id}/images`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserImage {
    pub id: String,
    pub original_name: String,
    pub file_name: String,
    pub url: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}
