//! Authentication context and hooks for the UI.
//!
//! [`AuthProvider`] creates the [`ApiClient`], wraps it in a [`Session`] and
//! keeps the resulting [`AuthState`] in a signal shared through context.
//! Pages read the state with [`use_auth`] and change it only through
//! [`use_auth_actions`].

use api::{ApiClient, ApiConfig, ApiError, Role, Session, SessionState, SessionStore, User};
use dioxus::prelude::*;

use crate::notifications::{notify, use_notifications, NotificationKind};

/// Authentication state for the application.
pub type AuthState = SessionState;

/// A [`SessionStore`] backed by the shared auth signal.
#[derive(Clone, Copy)]
pub struct AuthSignal(pub Signal<AuthState>);

impl SessionStore for AuthSignal {
    fn replace(&mut self, state: AuthState) {
        self.0.set(state);
    }
}

/// Get the current authentication state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// The client shared by every page.
pub fn use_api() -> ApiClient {
    use_context::<Session<ApiClient>>().backend().clone()
}

/// Login, registration and logout bound to the shared auth signal.
#[derive(Clone)]
pub struct AuthActions {
    session: Session<ApiClient>,
    state: Signal<AuthState>,
}

impl AuthActions {
    pub async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        self.session
            .login(&mut AuthSignal(self.state), username, password)
            .await
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<User, ApiError> {
        self.session
            .register(&mut AuthSignal(self.state), username, password, role)
            .await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.session.logout(&mut AuthSignal(self.state)).await
    }
}

pub fn use_auth_actions() -> AuthActions {
    AuthActions {
        session: use_context::<Session<ApiClient>>(),
        state: use_auth(),
    }
}

/// Provider component that manages authentication state.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let session = use_context_provider(|| Session::new(ApiClient::new(ApiConfig::from_env())));
    let auth_state = use_signal(AuthState::default);

    // Probe the session on mount
    let _ = use_resource(move || {
        let session = session.clone();
        async move {
            session.check_auth(&mut AuthSignal(auth_state)).await;
        }
    });

    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Log out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
    onlogout: Option<EventHandler<()>>,
) -> Element {
    let actions = use_auth_actions();
    let mut notifications = use_notifications();
    let mut busy = use_signal(|| false);

    let onclick = move |_| {
        let actions = actions.clone();
        async move {
            busy.set(true);
            match actions.logout().await {
                Ok(()) => {
                    if let Some(handler) = onlogout {
                        handler.call(());
                    }
                }
                Err(e) => {
                    tracing::error!("Logout failed: {}", e);
                    notify(&mut notifications, NotificationKind::Error, e.to_string());
                    busy.set(false);
                }
            }
        }
    };

    rsx! {
        button {
            class: "{class}",
            disabled: busy(),
            onclick: onclick,
            "{label}"
        }
    }
}
