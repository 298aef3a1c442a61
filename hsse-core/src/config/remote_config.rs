use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Remote write endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the remote API.
    pub base_url: String,
    /// Path the create-mutation is POSTed to.
    pub submit_path: String,
    /// Bearer token / API key, if any.
    pub api_key: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Transport-level retries within a single delivery attempt.
    pub max_retries: u32,
    /// Initial backoff (doubles each retry).
    pub initial_backoff_ms: u64,
    /// Backoff ceiling.
    pub max_backoff_ms: u64,
    /// Send the local id as an `Idempotency-Key` header.
    pub send_idempotency_key: bool,
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    /// Full URL of the submit endpoint.
    pub fn submit_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.submit_path
        )
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            submit_path: defaults::DEFAULT_SUBMIT_PATH.to_string(),
            api_key: None,
            timeout_ms: defaults::DEFAULT_TIMEOUT_MS,
            max_retries: defaults::DEFAULT_MAX_RETRIES,
            initial_backoff_ms: defaults::DEFAULT_INITIAL_BACKOFF_MS,
            max_backoff_ms: defaults::DEFAULT_MAX_BACKOFF_MS,
            send_idempotency_key: defaults::DEFAULT_SEND_IDEMPOTENCY_KEY,
        }
    }
}
