//! Connection management: pragma setup and the serialized write connection.

pub mod pragmas;
pub mod write_connection;

use std::path::Path;

use rusqlite::Connection;

use hsse_core::config::StorageConfig;
use hsse_core::errors::HsseResult;

pub use write_connection::WriteConnection;

use crate::to_storage_err;

/// Open a file-backed connection with pragmas applied.
pub fn open_connection(path: &Path, config: &StorageConfig) -> HsseResult<Connection> {
    let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
    pragmas::apply_pragmas(&conn, config)?;
    Ok(conn)
}

/// Open an in-memory connection (for testing).
pub fn open_in_memory_connection() -> HsseResult<Connection> {
    let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
    pragmas::apply_pragmas(&conn, &StorageConfig::default())?;
    Ok(conn)
}
