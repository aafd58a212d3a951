//! Data models exchanged with the image-hosting backend.

mod image;
mod user;

pub use image::{UploadResponse, UserImage};
pub use user::{AdminUser, AuthResponse, LoginRequest, RegisterRequest, Role, User};
