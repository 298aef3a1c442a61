//! PRAGMA configuration applied to every SQLite connection.
//!
//! WAL mode (configurable), NORMAL sync, busy_timeout.

use rusqlite::Connection;

use hsse_core::config::StorageConfig;
use hsse_core::errors::HsseResult;

use crate::to_storage_err;

/// Apply durability and locking pragmas to a connection.
pub fn apply_pragmas(conn: &Connection, config: &StorageConfig) -> HsseResult<()> {
    let journal_mode = if config.wal_mode { "WAL" } else { "DELETE" };
    conn.execute_batch(&format!(
        "
        PRAGMA journal_mode = {journal_mode};
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = {};
        ",
        config.busy_timeout_ms
    ))
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> HsseResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
