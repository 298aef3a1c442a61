use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use hsse_core::errors::{HsseResult, StorageError};
use hsse_core::traits::IKeyValueStore;

use crate::lock;

type Entry = (String, Option<Instant>);

/// In-memory store whose reads and writes can be made to fail on demand.
#[derive(Debug, Default)]
pub struct FlakyStore {
    entries: Mutex<HashMap<(String, String), Entry>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    writes: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Stored value regardless of expiry.
    pub fn raw(&self, namespace: &str, key: &str) -> Option<String> {
        lock(&self.entries)
            .get(&(namespace.to_string(), key.to_string()))
            .map(|(v, _)| v.clone())
    }

    fn unavailable(op: &str) -> StorageError {
        StorageError::Unavailable {
            reason: format!("injected {op} failure"),
        }
    }
}

impl IKeyValueStore for FlakyStore {
    async fn get(&self, namespace: &str, key: &str) -> HsseResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::unavailable("read").into());
        }
        let mut entries = lock(&self.entries);
        let k = (namespace.to_string(), key.to_string());
        match entries.get(&k) {
            Some((_, Some(exp))) if *exp <= Instant::now() => {
                entries.remove(&k);
                Ok(None)
            }
            Some((v, _)) => Ok(Some(v.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, namespace: &str, key: &str, value: &str, max_age: Option<Duration>) -> HsseResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::unavailable("write").into());
        }
        let expires = max_age.and_then(|age| Instant::now().checked_add(age));
        lock(&self.entries).insert(
            (namespace.to_string(), key.to_string()),
            (value.to_string(), expires),
        );
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, namespace: &str, key: &str) -> HsseResult<bool> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::unavailable("write").into());
        }
        let removed = lock(&self.entries).remove(&(namespace.to_string(), key.to_string()));
        Ok(matches!(removed, Some((_, exp)) if exp.map_or(true, |e| e > Instant::now())))
    }

    async fn keys(&self, namespace: &str) -> HsseResult<Vec<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::unavailable("read").into());
        }
        let now = Instant::now();
        let mut keys: Vec<String> = lock(&self.entries)
            .iter()
            .filter(|((ns, _), (_, exp))| ns == namespace && exp.map_or(true, |e| e > now))
            .map(|((_, k), _)| k.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}
