//! Versioned schema migrations, tracked in `schema_version`.

mod v001_kv_entries;
mod v002_expiry_index;

use rusqlite::Connection;

use hsse_core::errors::{HsseResult, StorageError};

use crate::to_storage_err;

type MigrateFn = fn(&Connection) -> HsseResult<()>;

const MIGRATIONS: &[(u32, &str, MigrateFn)] = &[
    (1, "kv_entries", v001_kv_entries::migrate),
    (2, "expiry_index", v002_expiry_index::migrate),
];

/// Highest schema version this build knows about.
pub const LATEST_VERSION: u32 = 2;

/// Apply every migration newer than the recorded version, each in its own
/// transaction. Returns the resulting schema version.
pub fn run_migrations(conn: &Connection) -> HsseResult<u32> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            name        TEXT NOT NULL,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let mut version = current_version(conn)?;
    for &(target, name, migrate) in MIGRATIONS {
        if target <= version {
            continue;
        }
        let failed = |reason: String| StorageError::MigrationFailed {
            version: target,
            reason,
        };
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| failed(e.to_string()))?;
        migrate(&tx).map_err(|e| failed(e.to_string()))?;
        tx.execute(
            "INSERT INTO schema_version (version, name) VALUES (?1, ?2)",
            rusqlite::params![target, name],
        )
        .map_err(|e| failed(e.to_string()))?;
        tx.commit().map_err(|e| failed(e.to_string()))?;
        tracing::debug!(version = target, name, "storage: applied migration");
        version = target;
    }
    Ok(version)
}

/// Highest applied migration, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> HsseResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
