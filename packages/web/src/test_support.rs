//! Headless router for page tests: a [`VirtualDom`] over [`MemoryHistory`]
//! with a fixed session and an API base URL chosen by the test.

use std::net::SocketAddr;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use api::{ApiClient, ApiConfig, ApiError, AuthBackend, Role, Session, SessionState, User};
use dioxus::history::MemoryHistory;
use dioxus::prelude::*;
use tokio::net::TcpListener;
use tokio::time::{timeout, Instant};
use ui::NotificationProvider;

use crate::Route;

/// Answers the session check with one user, or 401 when `None`.
struct FixedUser(Option<User>);

impl AuthBackend for FixedUser {
    async fn register(&self, _: &str, _: &str, _: Option<Role>) -> Result<User, ApiError> {
        Err(ApiError::Network("not used".to_string()))
    }

    async fn login(&self, _: &str, _: &str) -> Result<User, ApiError> {
        Err(ApiError::Network("not used".to_string()))
    }

    async fn logout(&self) -> Result<(), ApiError> {
        Ok(())
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.0.clone().ok_or_else(|| ApiError::from_response(401, Some("Unauthorized"), b""))
    }
}

/// Settled session for a user of `role`, or an anonymous one.
pub async fn session_as(role: Option<Role>) -> SessionState {
    let user = role.map(|role| User {
        id: "7".to_string(),
        username: "dana".to_string(),
        role,
        created_at: chrono::Utc::now(),
    });
    let mut state = SessionState::default();
    Session::new(FixedUser(user)).check_auth(&mut state).await;
    state
}

/// Local address that counts incoming connections and drops them.
pub async fn counting_backend() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            drop(stream);
        }
    });
    (format!("http://{addr}"), hits)
}

#[derive(Clone)]
struct Harness {
    history: Rc<MemoryHistory>,
    state: SessionState,
    api_base: String,
}

fn harness_root(props: Harness) -> Element {
    use_hook(|| {
        let history: Rc<dyn History> = props.history.clone();
        provide_context(history)
    });
    use_context_provider(|| Session::new(ApiClient::new(ApiConfig::new(props.api_base.clone()))));
    use_context_provider(|| Signal::new(props.state.clone()));

    rsx! {
        NotificationProvider {
            Router::<Route> {}
        }
    }
}

pub struct Headless {
    dom: VirtualDom,
    history: Rc<MemoryHistory>,
}

impl Headless {
    pub fn start(path: &str, state: SessionState, api_base: &str) -> Self {
        let history = Rc::new(MemoryHistory::with_initial_path(path));
        let props = Harness {
            history: history.clone(),
            state,
            api_base: api_base.to_string(),
        };
        let mut dom = VirtualDom::new_with_props(harness_root, props);
        dom.rebuild_in_place();
        Self { dom, history }
    }

    /// Process renders, effects and tasks for `duration`.
    pub async fn run_for(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() || timeout(left, self.dom.wait_for_work()).await.is_err() {
                break;
            }
            let _ = self.dom.render_immediate_to_vec();
        }
    }

    /// Path the router is currently showing.
    pub fn route(&self) -> String {
        self.history.current_route()
    }
}
