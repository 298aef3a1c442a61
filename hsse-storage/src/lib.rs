//! # hsse-storage
//!
//! Durable local store backing the offline queue and form drafts.
//! One SQLite table of `(namespace, key) -> value` rows with an optional
//! expiry timestamp; expired rows are invisible and pruned lazily.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use hsse_core::errors::{HsseError, StorageError};

/// Convert a SQLite error message into an `HsseError`.
pub(crate) fn to_storage_err(message: String) -> HsseError {
    StorageError::SqliteError { message }.into()
}
