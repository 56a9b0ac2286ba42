use notify_rust::Notification;

use super::Notifier;

/// OS notification center (notify-rust picks the platform backend).
#[derive(Debug, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str) {
        if let Err(e) = Notification::new().summary(title).body(message).show() {
            tracing::warn!(error = %e, "desktop notification failed");
        }
    }
}

/// Headless fallback: notifications become log lines.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, message: &str) {
        tracing::info!(title, message, "notification");
    }
}
