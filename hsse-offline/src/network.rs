//! Network reachability signal with change notifications.

use std::sync::Arc;

use tokio::sync::watch;

use hsse_observability::events;

/// Shared online/offline flag. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct NetworkMonitor {
    state: Arc<watch::Sender<bool>>,
}

impl NetworkMonitor {
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        Self {
            state: Arc::new(tx),
        }
    }

    /// Whether we believe the remote is reachable.
    pub fn is_online(&self) -> bool {
        *self.state.borrow()
    }

    /// Record reachability. Subscribers are only woken on a real change.
    /// Returns whether the state changed.
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.state.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            events::network_changed(online);
        }
        changed
    }

    pub fn go_offline(&self) -> bool {
        self.set_online(false)
    }

    pub fn go_online(&self) -> bool {
        self.set_online(true)
    }

    /// Receiver that wakes on every transition.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }
}

impl Default for NetworkMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_state_is_not_a_transition() {
        let net = NetworkMonitor::new(true);
        assert!(!net.go_online());
        assert!(net.go_offline());
        assert!(!net.go_offline());
        assert!(!net.is_online());
    }

    #[tokio::test]
    async fn subscribers_see_transitions() {
        let net = NetworkMonitor::new(false);
        let mut rx = net.subscribe();
        let clone = net.clone();
        clone.go_online();
        rx.changed().await.unwrap();
        assert!(*rx.borrow_and_update());
        assert!(net.is_online());
    }
}
