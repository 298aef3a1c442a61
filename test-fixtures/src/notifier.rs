use std::sync::Mutex;

use hsse_core::models::Notification;
use hsse_core::traits::INotifier;

use crate::lock;

/// Keeps every notification for later assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.seen).clone()
    }

    pub fn messages(&self) -> Vec<String> {
        lock(&self.seen).iter().map(|n| n.message.clone()).collect()
    }

    pub fn count(&self) -> usize {
        lock(&self.seen).len()
    }

    pub fn last(&self) -> Option<Notification> {
        lock(&self.seen).last().cloned()
    }
}

impl INotifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        lock(&self.seen).push(notification);
    }
}
