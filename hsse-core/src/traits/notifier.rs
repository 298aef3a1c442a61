use crate::models::Notification;

/// User-facing notification sink (toast, alert). Fire-and-forget.
pub trait INotifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
