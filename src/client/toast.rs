use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

/// How long a toast stays visible.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

/// Holds at most one transient notification. Showing a new one replaces the
/// current one and restarts its timer. Cloning shares the slot.
#[derive(Debug, Clone, Default)]
pub struct Toaster {
    slot: Arc<Mutex<Option<(Toast, Instant)>>>,
}

impl Toaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&self, kind: ToastKind, message: impl Into<String>) {
        let toast = Toast {
            kind,
            message: message.into(),
        };
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some((toast, Instant::now()));
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(ToastKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(ToastKind::Error, message);
    }

    /// The visible toast, if it was shown less than [`TOAST_DURATION`] ago.
    pub fn current(&self) -> Option<Toast> {
        let mut slot = self.slot.lock().ok()?;
        match slot.as_ref() {
            Some((toast, shown_at)) if shown_at.elapsed() < TOAST_DURATION => Some(toast.clone()),
            Some(_) => {
                *slot = None;
                None
            }
            None => None,
        }
    }

    pub fn dismiss(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}
