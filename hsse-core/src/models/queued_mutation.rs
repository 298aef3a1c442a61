use serde::{Deserialize, Serialize};

use super::sync_status::SyncStatus;
use crate::errors::{HsseError, HsseResult};

/// A write captured while offline, awaiting delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedMutation<M> {
    /// Client-generated id, unique within the queue and never reused.
    pub local_id: String,
    /// The caller's write. Immutable once queued.
    pub payload: M,
    /// Epoch milliseconds at enqueue time.
    pub created_at: i64,
    pub sync_status: SyncStatus,
    /// Set only while `sync_status == Failed`.
    #[serde(default)]
    pub sync_error: Option<String>,
    /// Number of delivery attempts made so far.
    #[serde(default)]
    pub attempts: u32,
    /// Epoch milliseconds of the most recent attempt.
    #[serde(default)]
    pub last_attempt_at: Option<i64>,
}

impl<M> QueuedMutation<M> {
    pub fn new(local_id: impl Into<String>, payload: M, created_at: i64) -> Self {
        Self {
            local_id: local_id.into(),
            payload,
            created_at,
            sync_status: SyncStatus::Pending,
            sync_error: None,
            attempts: 0,
            last_attempt_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.sync_status.is_active()
    }

    /// Whether the item is older than `max_age_ms` at `now`.
    pub fn is_expired(&self, now: i64, max_age_ms: i64) -> bool {
        now.saturating_sub(self.created_at) >= max_age_ms
    }

    fn transition(&mut self, next: SyncStatus) -> HsseResult<()> {
        if !self.sync_status.can_transition_to(next) {
            return Err(HsseError::InvalidTransition {
                from: self.sync_status,
                to: next,
            });
        }
        self.sync_status = next;
        Ok(())
    }

    /// `Pending | Failed -> Syncing`.
    pub fn begin_attempt(&mut self, now: i64) -> HsseResult<()> {
        self.transition(SyncStatus::Syncing)?;
        self.sync_error = None;
        self.attempts = self.attempts.saturating_add(1);
        self.last_attempt_at = Some(now);
        Ok(())
    }

    /// `Syncing -> Synced`.
    pub fn mark_synced(&mut self) -> HsseResult<()> {
        self.transition(SyncStatus::Synced)?;
        self.sync_error = None;
        Ok(())
    }

    /// `Syncing -> Failed`, recording the reason.
    pub fn mark_failed(&mut self, reason: impl Into<String>) -> HsseResult<()> {
        self.transition(SyncStatus::Failed)?;
        self.sync_error = Some(reason.into());
        Ok(())
    }

    /// Crash recovery: an item found `Syncing` on load was interrupted
    /// mid-flight and goes back to `Pending`. Returns whether it changed.
    pub fn reset_interrupted(&mut self) -> bool {
        if self.sync_status == SyncStatus::Syncing {
            self.sync_status = SyncStatus::Pending;
            self.sync_error = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> QueuedMutation<String> {
        QueuedMutation::new("local-1", "payload".to_string(), 1_000)
    }

    #[test]
    fn attempt_then_fail_then_retry_then_sync() {
        let mut m = item();
        m.begin_attempt(2_000).unwrap();
        m.mark_failed("HTTP 500").unwrap();
        assert_eq!(m.sync_status, SyncStatus::Failed);
        assert_eq!(m.sync_error.as_deref(), Some("HTTP 500"));

        m.begin_attempt(3_000).unwrap();
        assert!(m.sync_error.is_none());
        m.mark_synced().unwrap();
        assert_eq!(m.attempts, 2);
        assert_eq!(m.last_attempt_at, Some(3_000));
        assert!(!m.is_active());
    }

    #[test]
    fn cannot_leave_synced() {
        let mut m = item();
        m.begin_attempt(2_000).unwrap();
        m.mark_synced().unwrap();
        let err = m.begin_attempt(3_000).unwrap_err();
        assert!(matches!(
            err,
            HsseError::InvalidTransition {
                from: SyncStatus::Synced,
                to: SyncStatus::Syncing
            }
        ));
    }

    #[test]
    fn pending_cannot_jump_to_synced() {
        let mut m = item();
        assert!(m.mark_synced().is_err());
        assert_eq!(m.sync_status, SyncStatus::Pending);
    }

    #[test]
    fn interrupted_attempt_resets_to_pending() {
        let mut m = item();
        m.begin_attempt(2_000).unwrap();
        assert!(m.reset_interrupted());
        assert_eq!(m.sync_status, SyncStatus::Pending);
        assert!(!m.reset_interrupted());
    }

    #[test]
    fn expiry_is_age_based() {
        let m = item();
        assert!(!m.is_expired(1_500, 1_000));
        assert!(m.is_expired(2_000, 1_000));
    }

    #[test]
    fn old_records_without_attempt_fields_deserialize() {
        let json = r#"{"local_id":"local-9","payload":"x","created_at":5,"sync_status":"pending"}"#;
        let m: QueuedMutation<String> = serde_json::from_str(json).unwrap();
        assert_eq!(m.attempts, 0);
        assert!(m.sync_error.is_none());
    }
}
