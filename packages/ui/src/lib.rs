//! This crate contains all shared UI for the workspace.

mod auth;
pub use auth::{
    use_api, use_auth, use_auth_actions, AuthActions, AuthProvider, AuthSignal, AuthState,
    LogoutButton,
};

pub mod clipboard;
pub mod format;

mod navbar;
pub use navbar::Navbar;

pub mod notifications;
pub use notifications::{
    notify, use_notifications, NotificationKind, NotificationProvider, Notifications,
};

mod progress_bar;
pub use progress_bar::ProgressBar;

mod time;
