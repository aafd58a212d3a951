//! # Session state and the auth operations that change it
//!
//! [`SessionState`] is the client's view of the session: the signed-in
//! [`User`] (if any) and whether the initial session check is still running.
//! It can only be produced by [`Session`], whose four operations are the sole
//! way to move between states:
//!
//! - [`Session::check_auth`] asks the backend who is signed in. Any failure
//!   means "anonymous" and is not reported.
//! - [`Session::login`] exchanges credentials for a session.
//! - [`Session::register`] creates an account, then logs in with it.
//! - [`Session::logout`] ends the session.
//!
//! Where the state is kept is up to the caller through [`SessionStore`]. The
//! UI keeps it in a reactive signal; tests keep a plain value. The store is
//! updated only after the backend call has completed, and before the
//! operation returns, so anything that runs after a successful `login` sees
//! the new user.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{Role, User};

/// Client-side snapshot of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    user: Option<User>,
    loading: bool,
}

impl Default for SessionState {
    /// Initial state: nobody known yet, session check outstanding.
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

impl SessionState {
    fn authenticated(user: User) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }

    fn anonymous() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// True until the first session check has finished.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }
}

/// Somewhere to keep the current [`SessionState`].
pub trait SessionStore {
    fn replace(&mut self, state: SessionState);
}

impl SessionStore for SessionState {
    fn replace(&mut self, state: SessionState) {
        *self = state;
    }
}

/// The backend calls the session needs. [`ApiClient`] is the real one.
#[allow(async_fn_in_trait)]
pub trait AuthBackend {
    async fn register(&self, username: &str, password: &str, role: Option<Role>)
        -> Result<User, ApiError>;
    async fn login(&self, username: &str, password: &str) -> Result<User, ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
    async fn current_user(&self) -> Result<User, ApiError>;
}

impl AuthBackend for ApiClient {
    async fn register(
        &self,
        username: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<User, ApiError> {
        ApiClient::register(self, username, password, role).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        ApiClient::login(self, username, password).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        ApiClient::logout(self).await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        ApiClient::current_user(self).await
    }
}

/// Runs the auth operations against a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Session<B> {
    backend: B,
}

impl<B: AuthBackend> Session<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Probe the backend for the current session. Never fails: an error means
    /// the visitor is anonymous.
    pub async fn check_auth(&self, store: &mut impl SessionStore) {
        match self.backend.current_user().await {
            Ok(user) => {
                tracing::debug!("Session restored for {}", user.username);
                store.replace(SessionState::authenticated(user));
            }
            Err(e) => {
                if !e.is_unauthorized() {
                    tracing::warn!("Session check failed, continuing anonymously: {}", e);
                }
                store.replace(SessionState::anonymous());
            }
        }
    }

    /// Log in. On failure the store is left as it was.
    pub async fn login(
        &self,
        store: &mut impl SessionStore,
        username: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        let user = self.backend.login(username, password).await?;
        tracing::info!("Logged in as {} ({})", user.username, user.role);
        store.replace(SessionState::authenticated(user.clone()));
        Ok(user)
    }

    /// Create an account, then log in with the same credentials.
    pub async fn register(
        &self,
        store: &mut impl SessionStore,
        username: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<User, ApiError> {
        let created = self.backend.register(username, password, role).await?;
        tracing::info!("Registered {} ({})", created.username, created.role);
        self.login(store, username, password).await
    }

    /// End the session. The local user is cleared only if the backend agreed.
    pub async fn logout(&self, store: &mut impl SessionStore) -> Result<(), ApiError> {
        self.backend.logout().await?;
        store.replace(SessionState::anonymous());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory backend with one implicit cookie.
    #[derive(Default)]
    struct FakeBackend {
        accounts: RefCell<HashMap<String, (String, User)>>,
        signed_in: RefCell<Option<User>>,
        fail_logout: bool,
        calls: RefCell<Vec<&'static str>>,
    }

    impl FakeBackend {
        fn unauthorized() -> ApiError {
            ApiError::from_response(401, Some("Unauthorized"), br#"{"error":"Unauthorized","code":"UNAUTHORIZED"}"#)
        }
    }

    impl AuthBackend for FakeBackend {
        async fn register(
            &self,
            username: &str,
            password: &str,
            role: Option<Role>,
        ) -> Result<User, ApiError> {
            self.calls.borrow_mut().push("register");
            let mut accounts = self.accounts.borrow_mut();
            if accounts.contains_key(username) {
                return Err(ApiError::from_response(
                    400,
                    Some("Bad Request"),
                    br#"{"error":"username already exists","code":"USERNAME_EXISTS"}"#,
                ));
            }
            let user = User {
                id: format!("id-{}", accounts.len() + 1),
                username: username.to_string(),
                role: role.unwrap_or_default(),
                created_at: Utc::now(),
            };
            accounts.insert(username.to_string(), (password.to_string(), user.clone()));
            Ok(user)
        }

        async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
            self.calls.borrow_mut().push("login");
            match self.accounts.borrow().get(username) {
                Some((stored, user)) if stored == password => {
                    *self.signed_in.borrow_mut() = Some(user.clone());
                    Ok(user.clone())
                }
                _ => Err(ApiError::from_response(
                    401,
                    Some("Unauthorized"),
                    br#"{"error":"invalid credentials","code":"LOGIN_ERROR"}"#,
                )),
            }
        }

        async fn logout(&self) -> Result<(), ApiError> {
            self.calls.borrow_mut().push("logout");
            if self.fail_logout {
                return Err(ApiError::Network("connection reset".to_string()));
            }
            *self.signed_in.borrow_mut() = None;
            Ok(())
        }

        async fn current_user(&self) -> Result<User, ApiError> {
            self.calls.borrow_mut().push("me");
            self.signed_in.borrow().clone().ok_or_else(Self::unauthorized)
        }
    }

    #[tokio::test]
    async fn test_check_auth_anonymous_is_not_an_error() {
        let session = Session::new(FakeBackend::default());
        let mut state = SessionState::default();
        assert!(state.is_loading());

        session.check_auth(&mut state).await;

        assert!(!state.is_loading());
        assert!(!state.is_authenticated());
        assert!(!state.is_admin());
    }

    #[tokio::test]
    async fn test_check_auth_network_failure_is_anonymous() {
        struct Offline;
        impl AuthBackend for Offline {
            async fn register(&self, _: &str, _: &str, _: Option<Role>) -> Result<User, ApiError> {
                unreachable!()
            }
            async fn login(&self, _: &str, _: &str) -> Result<User, ApiError> {
                unreachable!()
            }
            async fn logout(&self) -> Result<(), ApiError> {
                unreachable!()
            }
            async fn current_user(&self) -> Result<User, ApiError> {
                Err(ApiError::Network("offline".to_string()))
            }
        }

        let mut state = SessionState::default();
        Session::new(Offline).check_auth(&mut state).await;
        assert_eq!(state, SessionState::anonymous());
    }

    #[tokio::test]
    async fn test_register_then_login_and_check() {
        let session = Session::new(FakeBackend::default());
        let mut state = SessionState::default();
        session.check_auth(&mut state).await;

        let user = session
            .register(&mut state, "alice", "secret1", None)
            .await
            .unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(state.user(), Some(&user));
        assert_eq!(
            *session.backend().calls.borrow(),
            vec!["me", "register", "login"]
        );

        // a fresh check returns the same user
        let mut reloaded = SessionState::default();
        session.check_auth(&mut reloaded).await;
        assert_eq!(reloaded.user(), Some(&user));
    }

    #[tokio::test]
    async fn test_login_visible_immediately() {
        let session = Session::new(FakeBackend::default());
        let mut state = SessionState::default();
        session
            .backend()
            .register("root", "hunter22", Some(Role::Admin))
            .await
            .unwrap();

        session.login(&mut state, "root", "hunter22").await.unwrap();

        assert!(state.is_authenticated());
        assert!(state.is_admin());
        assert_eq!(state.role(), Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_failed_login_keeps_state() {
        let session = Session::new(FakeBackend::default());
        let mut state = SessionState::default();
        session.check_auth(&mut state).await;
        let before = state.clone();

        let err = session.login(&mut state, "ghost", "nope").await.unwrap_err();

        assert_eq!(err.to_string(), "invalid credentials");
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn test_register_duplicate_surfaces_message() {
        let session = Session::new(FakeBackend::default());
        let mut state = SessionState::default();
        session.register(&mut state, "bob", "secret1", None).await.unwrap();

        let err = session
            .register(&mut state, "bob", "secret2", None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "username already exists");
    }

    #[tokio::test]
    async fn test_logout_clears_user() {
        let session = Session::new(FakeBackend::default());
        let mut state = SessionState::default();
        session.register(&mut state, "carol", "secret1", None).await.unwrap();

        session.logout(&mut state).await.unwrap();

        assert!(!state.is_authenticated());
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_logout_failure_keeps_user() {
        let session = Session::new(FakeBackend {
            fail_logout: true,
            ..Default::default()
        });
        let mut state = SessionState::default();
        session.register(&mut state, "dave", "secret1", None).await.unwrap();

        assert!(session.logout(&mut state).await.is_err());
        assert!(state.is_authenticated());
    }
}
