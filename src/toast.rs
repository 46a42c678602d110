use std::time::{Duration, Instant};
use tracing::warn;

pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl Severity {
    pub fn css_class(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    shown_at: Instant,
}

/// At most one toast at a time; a new one replaces the old one and restarts
/// the hide timer.
#[derive(Debug, Default)]
pub struct ToastService {
    current: Option<Toast>,
}

impl ToastService {
    pub fn show(&mut self, message: impl Into<String>, severity: Severity) {
        self.show_at(message, severity, Instant::now());
    }

    pub fn show_at(&mut self, message: impl Into<String>, severity: Severity, now: Instant) {
        let message = message.into();
        if severity == Severity::Error {
            warn!(%message, "error toast");
        }
        self.current = Some(Toast {
            message,
            severity,
            shown_at: now,
        });
    }

    pub fn visible(&self) -> Option<(&Toast, Duration)> {
        self.visible_at(Instant::now())
    }

    /// The visible toast and how long it has left.
    pub fn visible_at(&self, now: Instant) -> Option<(&Toast, Duration)> {
        let toast = self.current.as_ref()?;
        let elapsed = now.saturating_duration_since(toast.shown_at);
        if elapsed >= TOAST_DURATION {
            return None;
        }
        Some((toast, TOAST_DURATION - elapsed))
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
