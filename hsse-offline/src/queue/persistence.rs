//! Load / write-back of the queue list as one JSON document.

use std::time::Duration;

use hsse_core::config::OfflineConfig;
use hsse_core::errors::HsseResult;
use hsse_core::models::{MutationPayload, QueuedMutation};
use hsse_core::traits::IKeyValueStore;

/// Where the queue lives in the store.
#[derive(Debug, Clone)]
pub(crate) struct QueueSlot {
    pub namespace: String,
    pub key: String,
    pub retention: Duration,
}

impl QueueSlot {
    pub fn from_config(config: &OfflineConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            key: config.queue_key.clone(),
            retention: config.retention(),
        }
    }

    pub fn retention_ms(&self) -> i64 {
        i64::try_from(self.retention.as_millis()).unwrap_or(i64::MAX)
    }

    pub async fn load<S, M>(&self, store: &S) -> HsseResult<Vec<QueuedMutation<M>>>
    where
        S: IKeyValueStore,
        M: MutationPayload,
    {
        match store.get(&self.namespace, &self.key).await? {
            Some(doc) => Ok(serde_json::from_str(&doc)?),
            None => Ok(Vec::new()),
        }
    }

    /// Write the whole list in a single store write.
    pub async fn save<S, M>(&self, store: &S, items: &[QueuedMutation<M>]) -> HsseResult<()>
    where
        S: IKeyValueStore,
        M: MutationPayload,
    {
        let doc = serde_json::to_string(items)?;
        store
            .set(&self.namespace, &self.key, &doc, Some(self.retention))
            .await
    }
}

/// What `recover` changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Recovery {
    pub expired: usize,
    pub interrupted: usize,
}

impl Recovery {
    pub fn changed(&self) -> bool {
        self.expired > 0 || self.interrupted > 0
    }
}

/// Drop items past retention and return interrupted `syncing` items to
/// `pending`.
pub(crate) fn recover<M>(items: &mut Vec<QueuedMutation<M>>, now: i64, retention_ms: i64) -> Recovery {
    let before = items.len();
    items.retain(|item| !item.is_expired(now, retention_ms));
    let expired = before - items.len();
    let interrupted = items
        .iter_mut()
        .map(QueuedMutation::reset_interrupted)
        .filter(|&reset| reset)
        .count();
    Recovery {
        expired,
        interrupted,
    }
}
