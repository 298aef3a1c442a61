use std::fmt;

use serde::{Deserialize, Serialize};

/// Delivery status of a queued mutation.
///
/// Legal transitions: `Pending -> Syncing`, `Syncing -> Synced`,
/// `Syncing -> Failed`, `Failed -> Syncing`. Nothing leaves `Synced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Pending,
    Syncing,
    Synced,
    Failed,
}

impl SyncStatus {
    pub fn can_transition_to(self, next: SyncStatus) -> bool {
        matches!(
            (self, next),
            (SyncStatus::Pending, SyncStatus::Syncing)
                | (SyncStatus::Syncing, SyncStatus::Synced)
                | (SyncStatus::Syncing, SyncStatus::Failed)
                | (SyncStatus::Failed, SyncStatus::Syncing)
        )
    }

    /// Counted in the active/pending view.
    pub fn is_active(self) -> bool {
        self != SyncStatus::Synced
    }

    /// Eligible for a new delivery attempt.
    pub fn is_deliverable(self) -> bool {
        matches!(self, SyncStatus::Pending | SyncStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Synced => "synced",
            SyncStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
