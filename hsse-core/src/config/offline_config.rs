use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Offline queue and form-progress configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineConfig {
    /// Store namespace holding the queue (one namespace per domain).
    pub namespace: String,
    /// Key of the persisted queue list inside `namespace`.
    pub queue_key: String,
    /// Queued items older than this are dropped on load.
    pub retention_secs: u64,
    /// Namespace for in-progress form drafts.
    pub form_namespace: String,
    /// Retention of form drafts.
    pub form_retention_secs: u64,
    /// Sync automatically on offline -> online transitions.
    pub auto_sync: bool,
}

impl OfflineConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn form_retention(&self) -> Duration {
        Duration::from_secs(self.form_retention_secs)
    }
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            namespace: defaults::DEFAULT_QUEUE_NAMESPACE.to_string(),
            queue_key: defaults::DEFAULT_QUEUE_KEY.to_string(),
            retention_secs: defaults::DEFAULT_QUEUE_RETENTION_SECS,
            form_namespace: defaults::DEFAULT_FORM_NAMESPACE.to_string(),
            form_retention_secs: defaults::DEFAULT_FORM_RETENTION_SECS,
            auto_sync: defaults::DEFAULT_AUTO_SYNC,
        }
    }
}
