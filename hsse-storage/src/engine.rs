//! StorageEngine owns the write connection, runs migrations on open, and
//! implements `IKeyValueStore`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use hsse_core::config::StorageConfig;
use hsse_core::constants::now_ms;
use hsse_core::errors::HsseResult;
use hsse_core::traits::IKeyValueStore;

use crate::migrations;
use crate::pool::{self, WriteConnection};
use crate::queries::kv_ops;

/// The local durable store.
pub struct StorageEngine {
    writer: WriteConnection,
    db_path: Option<PathBuf>,
}

impl StorageEngine {
    /// Open a store backed by a file on disk with default settings.
    pub fn open(path: &Path) -> HsseResult<Self> {
        Self::open_with_config(path, &StorageConfig::default())
    }

    /// Open the store described by a config section.
    pub fn from_config(config: &StorageConfig) -> HsseResult<Self> {
        Self::open_with_config(Path::new(&config.db_path), config)
    }

    /// Open a file-backed store with explicit settings.
    pub fn open_with_config(path: &Path, config: &StorageConfig) -> HsseResult<Self> {
        let conn = pool::open_connection(path, config)?;
        let version = migrations::run_migrations(&conn)?;
        tracing::info!(path = %path.display(), schema_version = version, "storage: opened");
        Ok(Self {
            writer: WriteConnection::new(conn),
            db_path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory store (for testing). Nothing survives drop.
    pub fn open_in_memory() -> HsseResult<Self> {
        let conn = pool::open_in_memory_connection()?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            writer: WriteConnection::new(conn),
            db_path: None,
        })
    }

    /// Path of the backing file, `None` when in-memory.
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Remove every expired entry. Returns the number removed.
    pub async fn prune_expired(&self) -> HsseResult<usize> {
        let removed = self
            .writer
            .with_conn(|conn| kv_ops::prune_expired(conn, now_ms()))
            .await?;
        if removed > 0 {
            tracing::debug!(removed, "storage: pruned expired entries");
        }
        Ok(removed)
    }

    /// Number of live entries in a namespace.
    pub async fn count(&self, namespace: &str) -> HsseResult<usize> {
        self.writer
            .with_conn(|conn| kv_ops::count_live(conn, namespace, now_ms()))
            .await
    }

    /// Applied schema version.
    pub async fn schema_version(&self) -> HsseResult<u32> {
        self.writer.with_conn(migrations::current_version).await
    }

    /// Whether the connection runs in WAL mode.
    pub async fn is_wal(&self) -> HsseResult<bool> {
        self.writer
            .with_conn(pool::pragmas::verify_wal_mode)
            .await
    }
}

/// Absolute expiry for an entry written at `now`.
fn expiry_from(now: i64, max_age: Option<Duration>) -> Option<i64> {
    max_age.map(|age| {
        let ms = i64::try_from(age.as_millis()).unwrap_or(i64::MAX);
        now.saturating_add(ms)
    })
}

impl IKeyValueStore for StorageEngine {
    async fn get(&self, namespace: &str, key: &str) -> HsseResult<Option<String>> {
        self.writer
            .with_conn(|conn| kv_ops::get_value(conn, namespace, key, now_ms()))
            .await
    }

    async fn set(
        &self,
        namespace: &str,
        key: &str,
        value: &str,
        max_age: Option<Duration>,
    ) -> HsseResult<()> {
        self.writer
            .with_conn(|conn| {
                let now = now_ms();
                kv_ops::put_value(conn, namespace, key, value, now, expiry_from(now, max_age))
            })
            .await
    }

    async fn delete(&self, namespace: &str, key: &str) -> HsseResult<bool> {
        self.writer
            .with_conn(|conn| kv_ops::delete_value(conn, namespace, key, now_ms()))
            .await
    }

    async fn keys(&self, namespace: &str) -> HsseResult<Vec<String>> {
        self.writer
            .with_conn(|conn| kv_ops::list_keys(conn, namespace, now_ms()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_saturates() {
        assert_eq!(expiry_from(10, None), None);
        assert_eq!(expiry_from(10, Some(Duration::from_millis(5))), Some(15));
        assert_eq!(expiry_from(10, Some(Duration::MAX)), Some(i64::MAX));
    }
}
