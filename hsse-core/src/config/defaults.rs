// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "hsse-offline.db";
pub const DEFAULT_WAL_MODE: bool = true;
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

// --- Offline queue ---
pub const DEFAULT_QUEUE_NAMESPACE: &str = "ptw";
pub const DEFAULT_QUEUE_KEY: &str = crate::constants::DEFAULT_QUEUE_KEY;
pub const DEFAULT_QUEUE_RETENTION_SECS: u64 = 7 * 24 * 3600; // 7 days
pub const DEFAULT_AUTO_SYNC: bool = true;

// --- Form progress ---
pub const DEFAULT_FORM_NAMESPACE: &str = "form_progress";
pub const DEFAULT_FORM_RETENTION_SECS: u64 = 24 * 3600; // 24 hours

// --- Remote ---
pub const DEFAULT_SUBMIT_PATH: &str = "/rest/v1/ptw_permits";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 500;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 8_000;
pub const DEFAULT_SEND_IDEMPOTENCY_KEY: bool = true;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
