use hsse_core::models::SubmitReceipt;

/// Result of `enqueue_or_submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Online: delivered directly, nothing was queued.
    Submitted { receipt: SubmitReceipt },
    /// Offline: persisted locally under `local_id`.
    Queued { local_id: String },
}

impl SubmitOutcome {
    pub fn local_id(&self) -> Option<&str> {
        match self {
            SubmitOutcome::Queued { local_id } => Some(local_id),
            SubmitOutcome::Submitted { .. } => None,
        }
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, SubmitOutcome::Queued { .. })
    }
}

/// Why a sync pass did or did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncRunStatus {
    #[default]
    Completed,
    Offline,
    AlreadyRunning,
    NothingToSync,
}

impl SyncRunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SyncRunStatus::Completed => "completed",
            SyncRunStatus::Offline => "offline",
            SyncRunStatus::AlreadyRunning => "already_running",
            SyncRunStatus::NothingToSync => "nothing_to_sync",
        }
    }
}

/// Outcome of one `sync_all` pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub status: SyncRunStatus,
    /// Items delivered in this pass.
    pub synced: usize,
    /// Items that failed in this pass.
    pub failed: usize,
    /// `(local_id, reason)` for each failure.
    pub failures: Vec<(String, String)>,
}

impl SyncReport {
    pub(crate) fn skipped(status: SyncRunStatus) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn ran(&self) -> bool {
        self.status == SyncRunStatus::Completed
    }

    pub fn attempted(&self) -> usize {
        self.synced + self.failed
    }
}

/// Point-in-time view of the queue for status indicators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueStatus {
    pub online: bool,
    pub syncing: bool,
    /// Items not yet synced (pending, syncing, or failed).
    pub pending: usize,
    /// Subset of `pending` currently failed.
    pub failed: usize,
    /// Synced items still retained in storage.
    pub synced_retained: usize,
    /// Epoch ms of the last completed sync pass.
    pub last_sync_at: Option<i64>,
}
