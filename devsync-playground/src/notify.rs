//! Transient status messages ("toasts").
//!
//! One slot, last writer wins. Every notification is stamped with a fresh id and a
//! deferred task clears the slot after [`DISMISS_AFTER`], but only if the slot still
//! holds that same id. A stale timer from a replaced notification is a no-op.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

/// Visible window of every notification.
pub const DISMISS_AFTER: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    /// Background utility class of the toast.
    pub fn color_class(self) -> &'static str {
        match self {
            NotificationKind::Success => "bg-green-500",
            NotificationKind::Error => "bg-red-500",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            NotificationKind::Success => "Success!",
            NotificationKind::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
    pub visible_until: Instant,
}

impl Notification {
    pub fn is_visible_at(&self, now: Instant) -> bool {
        now < self.visible_until
    }
}

/// Cheap to clone; clones share the slot.
#[derive(Clone)]
pub struct NotificationService {
    slot: Arc<watch::Sender<Option<Notification>>>,
    window: Duration,
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationService {
    pub fn new() -> Self {
        Self::with_window(DISMISS_AFTER)
    }

    pub fn with_window(window: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            slot: Arc::new(tx),
            window,
        }
    }

    /// Show `message`, replacing anything visible, and schedule its dismissal.
    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
            visible_until: Instant::now() + self.window,
        };
        let id = notification.id;
        let until = notification.visible_until;
        debug!(%id, ?kind, message = %notification.message, "notify");
        self.slot.send_replace(Some(notification));
        self.schedule_dismissal(id, until);
        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.notify(message, NotificationKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.notify(message, NotificationKind::Error)
    }

    /// Clear the slot if it still holds `id`. Returns whether anything was cleared.
    pub fn dismiss(&self, id: Uuid) -> bool {
        dismiss_if_current(&self.slot, id)
    }

    /// The visible notification, if any. Expired entries are never returned, even if
    /// no runtime was around to run the dismissal task.
    pub fn current(&self) -> Option<Notification> {
        let now = Instant::now();
        match &*self.slot.borrow() {
            Some(n) if n.is_visible_at(now) => Some(n.clone()),
            _ => None,
        }
    }

    /// Watch the slot; the value changes on every notify and every dismissal.
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.slot.subscribe()
    }

    fn schedule_dismissal(&self, id: Uuid, until: Instant) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!(%id, "no runtime; dismissal enforced on read");
            return;
        };
        let slot = Arc::clone(&self.slot);
        handle.spawn(async move {
            tokio::time::sleep_until(until).await;
            if dismiss_if_current(&slot, id) {
                debug!(%id, "notification dismissed");
            }
        });
    }
}

fn dismiss_if_current(slot: &watch::Sender<Option<Notification>>, id: Uuid) -> bool {
    slot.send_if_modified(|current| match current {
        Some(n) if n.id == id => {
            *current = None;
            true
        }
        _ => false,
    })
}
