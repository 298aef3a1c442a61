//! v001: kv_entries.

use rusqlite::Connection;

use hsse_core::errors::HsseResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> HsseResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS kv_entries (
            namespace   TEXT NOT NULL,
            key         TEXT NOT NULL,
            value       TEXT NOT NULL,
            created_at  INTEGER NOT NULL,
            updated_at  INTEGER NOT NULL,
            expires_at  INTEGER,
            PRIMARY KEY (namespace, key)
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
