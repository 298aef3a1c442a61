//! Key-value CRUD with expiry. `now` is epoch milliseconds, passed in so
//! callers (and tests) control the clock.

use rusqlite::{params, Connection, OptionalExtension};

use hsse_core::errors::HsseResult;

use crate::to_storage_err;

/// Read a value. An expired row is deleted and reads as `None`.
pub fn get_value(conn: &Connection, namespace: &str, key: &str, now: i64) -> HsseResult<Option<String>> {
    let row: Option<(String, Option<i64>)> = conn
        .query_row(
            "SELECT value, expires_at FROM kv_entries WHERE namespace = ?1 AND key = ?2",
            params![namespace, key],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match row {
        Some((_, Some(expires_at))) if expires_at <= now => {
            conn.execute(
                "DELETE FROM kv_entries WHERE namespace = ?1 AND key = ?2",
                params![namespace, key],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
            Ok(None)
        }
        Some((value, _)) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Insert or overwrite a value. `created_at` is kept on overwrite.
pub fn put_value(
    conn: &Connection,
    namespace: &str,
    key: &str,
    value: &str,
    now: i64,
    expires_at: Option<i64>,
) -> HsseResult<()> {
    conn.execute(
        "INSERT INTO kv_entries (namespace, key, value, created_at, updated_at, expires_at)
         VALUES (?1, ?2, ?3, ?4, ?4, ?5)
         ON CONFLICT(namespace, key) DO UPDATE SET
             value = excluded.value,
             updated_at = excluded.updated_at,
             expires_at = excluded.expires_at",
        params![namespace, key, value, now, expires_at],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Delete a value. Returns whether a live (unexpired) entry was removed.
pub fn delete_value(conn: &Connection, namespace: &str, key: &str, now: i64) -> HsseResult<bool> {
    let removed = conn
        .execute(
            "DELETE FROM kv_entries
             WHERE namespace = ?1 AND key = ?2 AND (expires_at IS NULL OR expires_at > ?3)",
            params![namespace, key, now],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    // Drop an expired leftover too, it is invisible anyway.
    conn.execute(
        "DELETE FROM kv_entries WHERE namespace = ?1 AND key = ?2",
        params![namespace, key],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(removed > 0)
}

/// Live keys in a namespace, sorted.
pub fn list_keys(conn: &Connection, namespace: &str, now: i64) -> HsseResult<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT key FROM kv_entries
             WHERE namespace = ?1 AND (expires_at IS NULL OR expires_at > ?2)
             ORDER BY key",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![namespace, now], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<String>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Number of live entries in a namespace.
pub fn count_live(conn: &Connection, namespace: &str, now: i64) -> HsseResult<usize> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM kv_entries
             WHERE namespace = ?1 AND (expires_at IS NULL OR expires_at > ?2)",
            params![namespace, now],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(usize::try_from(count).unwrap_or(0))
}

/// Remove every expired row across all namespaces.
pub fn prune_expired(conn: &Connection, now: i64) -> HsseResult<usize> {
    conn.execute(
        "DELETE FROM kv_entries WHERE expires_at IS NOT NULL AND expires_at <= ?1",
        params![now],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
