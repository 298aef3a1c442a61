//! Durable, namespaced key-value storage with expiry.

use std::future::Future;
use std::time::Duration;

use crate::errors::HsseResult;

/// Durable local storage, scoped per namespace.
///
/// Values must survive process restarts. An entry written with `max_age`
/// stops being visible once that much time has passed since the write.
pub trait IKeyValueStore: Send + Sync + 'static {
    /// Read a live value. Expired entries read as `None`.
    fn get(
        &self,
        namespace: &str,
        key: &str,
    ) -> impl Future<Output = HsseResult<Option<String>>> + Send;

    /// Insert or overwrite a value. `None` means no expiry.
    fn set(
        &self,
        namespace: &str,
        key: &str,
        value: &str,
        max_age: Option<Duration>,
    ) -> impl Future<Output = HsseResult<()>> + Send;

    /// Remove a value. Returns whether a live entry was removed.
    fn delete(&self, namespace: &str, key: &str) -> impl Future<Output = HsseResult<bool>> + Send;

    /// Live keys in a namespace, sorted.
    fn keys(&self, namespace: &str) -> impl Future<Output = HsseResult<Vec<String>>> + Send;
}
