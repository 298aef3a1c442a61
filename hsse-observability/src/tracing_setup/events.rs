//! Structured log events for key queue operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// A write was captured offline.
pub fn mutation_queued(local_id: &str, label: &str, queue_len: usize) {
    tracing::info!(
        event = "mutation_queued",
        local_id = %local_id,
        label = %label,
        queue_len = queue_len,
        "mutation queued for later sync"
    );
}

/// An online write was rejected by the remote.
pub fn direct_submit_failed(label: &str, error: &str) {
    tracing::warn!(
        event = "direct_submit_failed",
        label = %label,
        error = %error,
        "direct submission failed"
    );
}

/// One queued item failed to deliver.
pub fn item_sync_failed(local_id: &str, attempts: u32, error: &str) {
    tracing::warn!(
        event = "item_sync_failed",
        local_id = %local_id,
        attempts = attempts,
        error = %error,
        "queued mutation failed to sync"
    );
}

/// A sync pass finished.
pub fn sync_completed(synced: usize, failed: usize, duration_ms: u128) {
    tracing::info!(
        event = "sync_completed",
        synced = synced,
        failed = failed,
        duration_ms = duration_ms as u64,
        "sync pass completed"
    );
}

/// A sync pass was requested but did not run.
pub fn sync_skipped(reason: &str) {
    tracing::debug!(event = "sync_skipped", reason = %reason, "sync pass skipped");
}

/// The persisted queue needed repair on load.
pub fn queue_recovered(expired: usize, interrupted: usize) {
    tracing::warn!(
        event = "queue_recovered",
        expired = expired,
        interrupted = interrupted,
        "offline queue repaired on load"
    );
}

/// Reachability changed.
pub fn network_changed(online: bool) {
    if online {
        tracing::info!(event = "network_changed", online, "network: online");
    } else {
        tracing::warn!(event = "network_changed", online, "network: offline");
    }
}
