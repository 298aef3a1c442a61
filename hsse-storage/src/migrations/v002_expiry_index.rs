//! v002: index for expiry sweeps.

use rusqlite::Connection;

use hsse_core::errors::HsseResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> HsseResult<()> {
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_kv_entries_expires_at
             ON kv_entries(expires_at) WHERE expires_at IS NOT NULL;",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
