//! # User models
//!
//! [`User`] is the backend's account record as seen by the client: id,
//! username, [`Role`] and creation time. The client never sees password
//! hashes or session tokens; the session lives in an HTTP-only cookie.
//!
//! [`AdminUser`] is the row returned by the admin listing, which adds the
//! number of images the user has uploaded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role. Decides the home route and what the guards admit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Parse the wire name; unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An account as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Body of `/api/auth/register`, `/api/auth/login` and `/api/auth/me` responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    /// Omitted on the wire when `None`; the backend then assigns `user`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// One row of `GET /api/admin/users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub image_count: u64,
}

impl AdminUser {
    /// First eight characters of the id, for compact tables.
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(8) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_from_backend_json() {
        let json = r#"{
            "user": {
                "id": "6f1c2d3e-0000-4000-8000-000000000001",
                "username": "alice",
                "role": "user",
                "created_at": "2024-03-01T12:30:00+03:00"
            }
        }"#;
        let resp: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.user.username, "alice");
        assert_eq!(resp.user.role, Role::User);
        assert!(!resp.user.is_admin());
        assert_eq!(resp.user.created_at.to_rfc3339(), "2024-03-01T09:30:00+00:00");
    }

    #[test]
    fn test_register_request_omits_missing_role() {
        let req = RegisterRequest {
            username: "alice".to_string(),
            password: "secret1".to_string(),
            role: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("role").is_none());

        let req = RegisterRequest {
            role: Some(Role::Admin),
            ..req
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["role"], "admin");
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("root"), None);
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_short_id() {
        let user = AdminUser {
            id: "0123456789abcdef".to_string(),
            username: "bob".to_string(),
            role: Role::User,
            created_at: Utc::now(),
            image_count: 3,
        };
        assert_eq!(user.short_id(), "01234567");

        let short = AdminUser {
            id: "abc".to_string(),
            ..user
        };
        assert_eq!(short.short_id(), "abc");
    }
}
