//! Form-progress side channel: in-progress drafts saved under their own
//! namespace with a short retention. One slot per key, no status tracking.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use hsse_core::config::OfflineConfig;
use hsse_core::errors::HsseResult;
use hsse_core::traits::IKeyValueStore;

pub struct FormProgressStore<S> {
    store: Arc<S>,
    namespace: String,
    retention: Duration,
}

impl<S: IKeyValueStore> FormProgressStore<S> {
    pub fn new(store: Arc<S>, config: &OfflineConfig) -> Self {
        Self {
            store,
            namespace: config.form_namespace.clone(),
            retention: config.form_retention(),
        }
    }

    /// Save a draft, overwriting any previous draft under `key`. The
    /// retention window restarts on every save.
    pub async fn save<T: Serialize>(&self, key: &str, draft: &T) -> HsseResult<()> {
        let doc = serde_json::to_string(draft)?;
        self.store
            .set(&self.namespace, key, &doc, Some(self.retention))
            .await
    }

    /// Load a live draft. Expired or missing drafts read as `None`.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> HsseResult<Option<T>> {
        match self.store.get(&self.namespace, key).await? {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }

    /// Drop a draft, typically after the form was submitted.
    pub async fn clear(&self, key: &str) -> HsseResult<bool> {
        self.store.delete(&self.namespace, key).await
    }

    /// Keys with a live draft.
    pub async fn list_saved(&self) -> HsseResult<Vec<String>> {
        self.store.keys(&self.namespace).await
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }
}
