use std::time::Duration;

use dioxus::core::spawn_forever;
use dioxus::prelude::*;

use crate::time::sleep;

const NOTIFICATIONS_CSS: Asset = asset!("/assets/notifications.css");

/// How long a toast stays up unless clicked away.
pub const AUTO_DISMISS: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub text: String,
    pub kind: NotificationKind,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Notifications {
    entries: Vec<Notification>,
    next_id: u64,
}

impl Notifications {
    /// Add a toast and return its id.
    pub fn push(&mut self, kind: NotificationKind, text: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.entries.push(Notification {
            id,
            text: text.into(),
            kind,
        });
        id
    }

    /// Remove a toast. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|n| n.id != id);
        self.entries.len() != before
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }
}

pub fn use_notifications() -> Signal<Notifications> {
    use_context::<Signal<Notifications>>()
}

/// Show a toast and schedule its removal.
///
/// The timer runs on the root scope, so it still fires after the calling
/// component unmounts (a page that navigates away right after notifying).
pub fn notify(notifications: &mut Signal<Notifications>, kind: NotificationKind, text: impl Into<String>) {
    let id = notifications.write().push(kind, text);
    let mut notifications = *notifications;
    spawn_forever(async move {
        sleep(AUTO_DISMISS).await;
        if let Ok(mut list) = notifications.try_write() {
            list.dismiss(id);
        }
    });
}

/// Provides the notification signal and renders the toasts above `children`.
#[component]
pub fn NotificationProvider(children: Element) -> Element {
    let mut notifications = use_context_provider(|| Signal::new(Notifications::default()));
    let entries = notifications().entries().to_vec();

    rsx! {
        document::Stylesheet { href: NOTIFICATIONS_CSS }

        {children}

        div {
            class: "notifications",
            for entry in entries {
                div {
                    key: "{entry.id}",
                    class: match entry.kind {
                        NotificationKind::Success => "notification success",
                        NotificationKind::Error => "notification error",
                    },
                    onclick: move |_| {
                        notifications.write().dismiss(entry.id);
                    },
                    "{entry.text}"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_push_assigns_increasing_ids() {
        let mut list = Notifications::default();
        let a = list.push(NotificationKind::Success, "Image uploaded");
        let b = list.push(NotificationKind::Error, "Upload failed");
        assert!(b > a);
        assert_eq!(list.entries().len(), 2);
        assert_eq!(list.entries()[1].kind, NotificationKind::Error);
    }

    #[test]
    fn test_dismiss_once() {
        let mut list = Notifications::default();
        let id = list.push(NotificationKind::Success, "Link copied");
        assert!(list.dismiss(id));
        assert!(!list.dismiss(id));
        assert!(list.entries().is_empty());
    }

    #[test]
    fn test_ids_not_reused_after_dismiss() {
        let mut list = Notifications::default();
        let first = list.push(NotificationKind::Success, "one");
        list.dismiss(first);
        let second = list.push(NotificationKind::Success, "two");
        assert_ne!(first, second);
    }

    thread_local! {
        static HANDLES: Cell<Option<(Signal<bool>, Signal<Notifications>)>> = const { Cell::new(None) };
        static CALLER_GONE: Cell<bool> = const { Cell::new(false) };
    }

    fn app() -> Element {
        let show = use_signal(|| true);
        rsx! {
            NotificationProvider {
                Watcher { show }
                if show() {
                    Caller {}
                }
            }
        }
    }

    #[component]
    fn Watcher(show: Signal<bool>) -> Element {
        let notifications = use_notifications();
        use_hook(|| HANDLES.with(|h| h.set(Some((show, notifications)))));
        rsx! {}
    }

    #[component]
    fn Caller() -> Element {
        let mut notifications = use_notifications();
        use_effect(move || notify(&mut notifications, NotificationKind::Success, "Link copied"));
        use_drop(|| CALLER_GONE.with(|gone| gone.set(true)));
        rsx! {}
    }

    /// Drive the dom until `duration` of (paused) tokio time has passed.
    async fn run_for(dom: &mut VirtualDom, duration: Duration) {
        let deadline = tokio::time::Instant::now() + duration;
        loop {
            let left = deadline.saturating_duration_since(tokio::time::Instant::now());
            if left.is_zero() || tokio::time::timeout(left, dom.wait_for_work()).await.is_err() {
                break;
            }
            let _ = dom.render_immediate_to_vec();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_dismissed_after_caller_unmounts() {
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
        run_for(&mut dom, Duration::from_millis(100)).await;

        let (mut show, notifications) = HANDLES.with(|h| h.get()).expect("watcher mounted");
        assert_eq!(dom.in_runtime(|| notifications.peek().entries().len()), 1);

        dom.in_runtime(|| show.set(false));
        run_for(&mut dom, Duration::from_millis(100)).await;
        assert!(CALLER_GONE.with(|gone| gone.get()));
        assert_eq!(dom.in_runtime(|| notifications.peek().entries().len()), 1);

        run_for(&mut dom, AUTO_DISMISS).await;
        assert_eq!(dom.in_runtime(|| notifications.peek().entries().len()), 0);
    }
}
