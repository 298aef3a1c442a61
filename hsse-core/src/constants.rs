//! Workspace-wide constants and small time helpers.

use chrono::Utc;

/// Prefix of every client-generated queue id.
pub const LOCAL_ID_PREFIX: &str = "local-";

/// Key of the persisted queue list inside its namespace.
pub const DEFAULT_QUEUE_KEY: &str = "pending_permits";

/// Header carrying the local id to the remote endpoint.
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generate a fresh local id: `local-<epoch-ms>-<uuid>`.
pub fn generate_local_id() -> String {
    format!(
        "{LOCAL_ID_PREFIX}{}-{}",
        now_ms(),
        uuid::Uuid::new_v4().simple()
    )
}
