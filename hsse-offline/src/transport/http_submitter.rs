//! HTTP submitter with connect-failure retry, exponential backoff, timeout,
//! and gzip.

use std::time::Duration;

use serde_json::Value;

use hsse_core::config::RemoteConfig;
use hsse_core::errors::SubmitError;
use hsse_core::models::{MutationPayload, SubmitReceipt};
use hsse_core::traits::IRemoteSubmitter;

#[cfg(feature = "remote")]
use hsse_core::constants::{now_ms, IDEMPOTENCY_HEADER};

fn net_err(reason: String) -> SubmitError {
    SubmitError::Network { reason }
}

/// POSTs each mutation as JSON to `{base_url}{submit_path}`.
///
/// Wraps reqwest when the `remote` feature is enabled. Without it every
/// submit fails with a network error, so queued items stay queued.
#[derive(Debug)]
pub struct HttpSubmitter {
    config: RemoteConfig,
    #[cfg(feature = "remote")]
    client: reqwest::Client,
}

impl HttpSubmitter {
    pub fn new(config: RemoteConfig) -> Result<Self, SubmitError> {
        #[cfg(feature = "remote")]
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .gzip(true)
            .build()
            .map_err(|e| net_err(e.to_string()))?;

        Ok(Self {
            config,
            #[cfg(feature = "remote")]
            client,
        })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Retry loop around `post_once`. Only connection failures are resent:
    /// a rejection, timeout, or reset may follow a committed write and is
    /// returned at once.
    #[cfg(feature = "remote")]
    async fn post_with_retry(&self, local_id: &str, body: Vec<u8>) -> Result<SubmitReceipt, SubmitError> {
        let url = self.config.submit_url();
        let mut last_err = net_err("no attempt made".into());

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let backoff = backoff_for(&self.config, attempt);
                tracing::debug!(
                    "remote: retry attempt {}/{} for {} after {:?}",
                    attempt,
                    self.config.max_retries,
                    local_id,
                    backoff
                );
                tokio::time::sleep(backoff).await;
            }

            match self.post_once(&url, local_id, body.clone()).await {
                Ok(receipt) => return Ok(receipt),
                Err(e) if e.is_safe_to_resend() => last_err = e,
                Err(e) => return Err(e),
            }
        }

        Err(last_err)
    }

    #[cfg(feature = "remote")]
    async fn post_once(&self, url: &str, local_id: &str, body: Vec<u8>) -> Result<SubmitReceipt, SubmitError> {
        let mut req = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header("Prefer", "return=representation")
            .body(body);
        if self.config.send_idempotency_key {
            req = req.header(IDEMPOTENCY_HEADER, local_id);
        }
        if let Some(ref key) = self.config.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await.map_err(from_reqwest)?;
        let status = resp.status();
        let text = resp.text().await.map_err(from_reqwest)?;
        if status.is_success() {
            Ok(SubmitReceipt {
                remote_id: parse_remote_id(&text),
                submitted_at: now_ms(),
            })
        } else {
            Err(SubmitError::Rejected {
                status: status.as_u16(),
                body: text,
            })
        }
    }
}

#[cfg(feature = "remote")]
fn from_reqwest(e: reqwest::Error) -> SubmitError {
    if e.is_connect() {
        SubmitError::Unreachable {
            reason: e.to_string(),
        }
    } else if e.is_timeout() {
        SubmitError::Timeout
    } else {
        net_err(e.to_string())
    }
}

impl<M: MutationPayload> IRemoteSubmitter<M> for HttpSubmitter {
    async fn submit(&self, local_id: &str, payload: &M) -> Result<SubmitReceipt, SubmitError> {
        let body = serde_json::to_vec(payload).map_err(|e| SubmitError::Encoding {
            reason: e.to_string(),
        })?;

        #[cfg(feature = "remote")]
        {
            self.post_with_retry(local_id, body).await
        }

        #[cfg(not(feature = "remote"))]
        {
            let _ = (local_id, body);
            Err(net_err("remote feature not enabled".into()))
        }
    }
}

/// Delay before retry number `attempt` (1-based): the initial backoff
/// doubled per retry, capped at `max_backoff`.
pub fn backoff_for(config: &RemoteConfig, attempt: u32) -> Duration {
    let factor = 1u32
        .checked_shl(attempt.saturating_sub(1))
        .unwrap_or(u32::MAX);
    config
        .initial_backoff()
        .saturating_mul(factor)
        .min(config.max_backoff())
}

/// Pull the created record's id out of a response body. Accepts an object
/// or a one-element array (PostgREST `return=representation`), with a
/// string or numeric `id`.
pub fn parse_remote_id(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let record = match value {
        Value::Array(mut rows) if !rows.is_empty() => rows.swap_remove(0),
        other => other,
    };
    match record.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RemoteConfig {
        RemoteConfig {
            initial_backoff_ms: 500,
            max_backoff_ms: 3_000,
            ..Default::default()
        }
    }

    #[test]
    fn backoff_doubles_then_caps() {
        let c = config();
        assert_eq!(backoff_for(&c, 1), Duration::from_millis(500));
        assert_eq!(backoff_for(&c, 2), Duration::from_millis(1_000));
        assert_eq!(backoff_for(&c, 3), Duration::from_millis(2_000));
        assert_eq!(backoff_for(&c, 4), Duration::from_millis(3_000));
        assert_eq!(backoff_for(&c, 40), Duration::from_millis(3_000));
    }

    #[test]
    fn remote_id_from_object_or_array() {
        assert_eq!(parse_remote_id(r#"{"id":"abc"}"#).as_deref(), Some("abc"));
        assert_eq!(parse_remote_id(r#"[{"id":42,"status":"draft"}]"#).as_deref(), Some("42"));
        assert_eq!(parse_remote_id("[]"), None);
        assert_eq!(parse_remote_id(""), None);
        assert_eq!(parse_remote_id(r#"{"id":null}"#), None);
    }

    #[test]
    fn submit_url_joins_base_and_path() {
        let c = RemoteConfig {
            base_url: "https://api.example.test/".into(),
            ..Default::default()
        };
        assert_eq!(c.submit_url(), "https://api.example.test/rest/v1/ptw_permits");
    }

    #[cfg(not(feature = "remote"))]
    #[tokio::test]
    async fn without_remote_feature_submit_is_a_network_error() {
        use hsse_core::models::{HsseMutation, IncidentDraft};

        let submitter = HttpSubmitter::new(config()).unwrap();
        let payload = HsseMutation::ReportIncident(IncidentDraft {
            site_id: "S1".into(),
            title: "Spill".into(),
            severity: "minor".into(),
            description: None,
            occurred_at: None,
            extra: Default::default(),
        });
        let err = submitter.submit("local-1", &payload).await.unwrap_err();
        assert!(matches!(err, SubmitError::Network { .. }));
    }
}
