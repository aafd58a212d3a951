//! # REST client for the image-hosting backend
//!
//! [`ApiClient`] wraps a `reqwest::Client` that always carries the session
//! cookie: natively through reqwest's cookie store, in the browser by sending
//! `fetch` requests with `credentials: "include"`.
//!
//! Every JSON call goes through one helper, [`ApiClient::send_json`], which
//! turns a non-2xx status into [`ApiError::Server`] (using the backend's
//! `{error, code?}` body when there is one) and a malformed 2xx body into
//! [`ApiError::Parse`].
//!
//! | Method | Endpoint |
//! |--------|----------|
//! | [`register`](ApiClient::register) | `POST /api/auth/register` |
//! | [`login`](ApiClient::login) | `POST /api/auth/login` |
//! | [`logout`](ApiClient::logout) | `POST /api/auth/logout` |
//! | [`current_user`](ApiClient::current_user) | `GET /api/auth/me` |
//! | [`admin_users`](ApiClient::admin_users) | `GET /api/admin/users` |
//! | [`user_images`](ApiClient::user_images) | `GET /api/admin/users/{id}/images` |
//! | [`start_upload`](ApiClient::start_upload) | `POST /api/upload` (see [`crate::upload`]) |

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{
    AdminUser, AuthResponse, LoginRequest, RegisterRequest, Role, User, UserImage,
};

/// HTTP client bound to one backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl PartialEq for ApiClient {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
    }
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            http: build_http_client(),
            config,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<User, ApiError> {
        let body = RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            role,
        };
        let resp: AuthResponse = self
            .send_json(self.post("/api/auth/register").json(&body))
            .await?;
        Ok(resp.user)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let resp: AuthResponse = self
            .send_json(self.post("/api/auth/login").json(&body))
            .await?;
        Ok(resp.user)
    }

    /// Invalidate the session. The response body is ignored.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.send(self.post("/api/auth/logout")).await?;
        Ok(())
    }

    /// The user behind the current session cookie.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let resp: AuthResponse = self.send_json(self.get("/api/auth/me")).await?;
        Ok(resp.user)
    }

    pub async fn admin_users(&self) -> Result<Vec<AdminUser>, ApiError> {
        let users: NullableList<AdminUser> = self.send_json(self.get("/api/admin/users")).await?;
        Ok(users.into_vec())
    }

    pub async fn user_images(&self, user_id: &str) -> Result<Vec<UserImage>, ApiError> {
        let path = format!("/api/admin/users/{}/images", encode_segment(user_id));
        let images: NullableList<UserImage> = self.send_json(self.get(&path)).await?;
        Ok(images.into_vec())
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        with_credentials(self.http.request(method, self.config.url(path)))
    }

    /// Send a request and decode its JSON body as `T`.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Send a request, returning the raw body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        tracing::debug!("{} -> {}", response.url().path(), status);

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if status.is_success() {
            Ok(body.to_vec())
        } else {
            Err(ApiError::from_response(
                status.as_u16(),
                status.canonical_reason(),
                &body,
            ))
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap_or_else(|e| {
            tracing::error!("Failed to build HTTP client with cookie store: {}", e);
            reqwest::Client::new()
        })
}

#[cfg(target_arch = "wasm32")]
fn build_http_client() -> reqwest::Client {
    reqwest::Client::new()
}

#[cfg(not(target_arch = "wasm32"))]
fn with_credentials(request: RequestBuilder) -> RequestBuilder {
    request
}

#[cfg(target_arch = "wasm32")]
fn with_credentials(request: RequestBuilder) -> RequestBuilder {
    request.fetch_credentials_include()
}

/// The backend encodes an empty list as `null`.
#[derive(Deserialize)]
#[serde(transparent)]
struct NullableList<T>(Option<Vec<T>>);

impl<T> NullableList<T> {
    fn into_vec(self) -> Vec<T> {
        self.0.unwrap_or_default()
    }
}

/// Percent-encode a path segment (ids are UUIDs, but don't trust route params).
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nullable_list() {
        let list: NullableList<u32> = serde_json::from_str("null").unwrap();
        assert!(list.into_vec().is_empty());
        let list: NullableList<u32> = serde_json::from_str("[1,2]").unwrap();
        assert_eq!(list.into_vec(), vec![1, 2]);
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("6f1c-42"), "6f1c-42");
        assert_eq!(encode_segment("../admin"), "..%2Fadmin");
        assert_eq!(encode_segment("a b"), "a%20b");
    }
}
