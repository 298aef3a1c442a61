//! Default notification sink and the messages the queue raises.

use hsse_core::models::{Notification, NotificationLevel};
use hsse_core::traits::INotifier;

/// Routes notifications to the log. Used when no UI sink is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl INotifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.level {
            NotificationLevel::Error => tracing::error!(title = %n.title, "{}", n.message),
            NotificationLevel::Warning => tracing::warn!(title = %n.title, "{}", n.message),
            NotificationLevel::Info | NotificationLevel::Success => {
                tracing::info!(title = %n.title, "{}", n.message)
            }
        }
    }
}

/// "N synced" or "N synced, M failed".
pub fn summary_message(synced: usize, failed: usize) -> String {
    if failed == 0 {
        format!("{synced} synced")
    } else {
        format!("{synced} synced, {failed} failed")
    }
}

pub(crate) fn queued_offline(label: &str) -> Notification {
    Notification::info(
        "Saved offline",
        format!("{label} will be submitted when the connection returns"),
    )
}

pub(crate) fn sync_summary(synced: usize, failed: usize) -> Notification {
    let message = summary_message(synced, failed);
    match (synced, failed) {
        (_, 0) => Notification::success("Sync complete", message),
        (0, _) => Notification::error("Sync failed", message),
        _ => Notification::warning("Sync partially complete", message),
    }
}

pub(crate) fn retry_succeeded(label: &str) -> Notification {
    Notification::success("Synced", format!("{label} synced"))
}

pub(crate) fn retry_failed(label: &str, reason: &str) -> Notification {
    Notification::error("Sync failed", format!("{label}: {reason}"))
}
