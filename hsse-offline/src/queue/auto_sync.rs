//! Background sync on reconnect.

use std::sync::Arc;

use tokio::task::JoinHandle;

use hsse_core::models::MutationPayload;
use hsse_core::traits::{IKeyValueStore, IRemoteSubmitter};

use super::OfflineQueue;

impl<M, S, R> OfflineQueue<M, S, R>
where
    M: MutationPayload,
    S: IKeyValueStore,
    R: IRemoteSubmitter<M>,
{
    /// Run `sync_all` once now if online, then on every offline -> online
    /// transition. Returns `None` when `auto_sync` is disabled.
    ///
    /// The task runs until aborted. Errors are logged, never returned.
    pub fn spawn_auto_sync(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.auto_sync {
            tracing::debug!("offline queue: auto-sync disabled");
            return None;
        }

        let mut rx = self.network.subscribe();
        Some(tokio::spawn(async move {
            if *rx.borrow_and_update() {
                self.sync_logged().await;
            }

            // The monitor only signals real changes, so waking up online
            // means we came back from offline (possibly several flips
            // coalesced into one wake-up).
            while rx.changed().await.is_ok() {
                let online = *rx.borrow_and_update();
                if online {
                    self.sync_logged().await;
                }
            }
        }))
    }

    async fn sync_logged(&self) {
        match self.sync_all().await {
            Ok(report) if report.ran() => {
                tracing::debug!(
                    synced = report.synced,
                    failed = report.failed,
                    "offline queue: auto-sync pass finished"
                );
            }
            Ok(_) => {}
            Err(e) => tracing::error!("offline queue: auto-sync failed to persist: {e}"),
        }
    }
}
