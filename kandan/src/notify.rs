//! Toast notifications with auto-expiry and manual dismissal.
//!
//! [`ToastCenter`] is the display-side collaborator for
//! [`BoardEvent::Notice`](crate::board::BoardEvent::Notice): it holds the
//! currently visible toasts, drops each one after a fixed display duration,
//! and supports dismissing a toast early. Expiry is evaluated lazily against
//! `tokio::time::Instant` so paused-clock tests can drive it.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// Visual styling of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Confirmation of a committed action.
    Success,
    /// A failed remote operation.
    Error,
}

/// Identifier for one displayed toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(u64);

/// A toast currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Handle for manual dismissal.
    pub id: ToastId,
    /// Message text.
    pub message: String,
    /// Success or error styling.
    pub kind: ToastKind,
}

struct Entry {
    toast: Toast,
    expires_at: Instant,
}

/// Holds visible toasts and their display deadlines.
pub struct ToastCenter {
    entries: Mutex<Vec<Entry>>,
    display_duration: Duration,
    next_id: Mutex<u64>,
}

impl ToastCenter {
    /// The original display duration: four seconds.
    pub const DEFAULT_DISPLAY_DURATION: Duration = Duration::from_millis(4000);

    /// Creates a toast center with the given display duration.
    #[must_use]
    pub fn new(display_duration: Duration) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            display_duration,
            next_id: Mutex::new(0),
        }
    }

    /// Shows a toast, returning its dismissal handle.
    pub fn push(&self, message: impl Into<String>, kind: ToastKind) -> ToastId {
        let id = {
            let mut next = self.next_id.lock();
            let id = ToastId(*next);
            *next += 1;
            id
        };
        let toast = Toast {
            id,
            message: message.into(),
            kind,
        };
        tracing::debug!(?kind, message = %toast.message, "toast shown");
        self.entries.lock().push(Entry {
            toast,
            expires_at: Instant::now() + self.display_duration,
        });
        id
    }

    /// Dismisses a toast before its deadline. Returns whether it was visible.
    pub fn dismiss(&self, id: ToastId) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|e| e.toast.id != id);
        entries.len() < before
    }

    /// Currently visible toasts, oldest first. Expired entries are pruned.
    #[must_use]
    pub fn active(&self) -> Vec<Toast> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|e| e.expires_at > now);
        entries.iter().map(|e| e.toast.clone()).collect()
    }
}

impl Default for ToastCenter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DISPLAY_DURATION)
    }
}
