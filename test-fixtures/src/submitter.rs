use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use hsse_core::constants::now_ms;
use hsse_core::errors::SubmitError;
use hsse_core::models::{HsseMutation, SubmitReceipt};
use hsse_core::traits::IRemoteSubmitter;

use crate::lock;

type FailRule = Box<dyn Fn(&HsseMutation) -> Option<SubmitError> + Send + Sync>;

/// Remote endpoint double. Succeeds unless a fail rule matches, records
/// every call, and tracks peak concurrency.
#[derive(Default)]
pub struct ScriptedSubmitter {
    rule: Mutex<Option<FailRule>>,
    delay: Mutex<Duration>,
    calls: Mutex<Vec<(String, HsseMutation)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with a network error.
    pub fn always_failing() -> Self {
        let s = Self::new();
        s.fail_when(|_| {
            Some(SubmitError::Network {
                reason: "connection refused".into(),
            })
        });
        s
    }

    /// Permits for the given projects fail with HTTP 500; everything else
    /// succeeds.
    pub fn fail_projects(&self, project_ids: &[&str]) {
        let ids: HashSet<String> = project_ids.iter().map(|s| s.to_string()).collect();
        self.fail_when(move |m| match m {
            HsseMutation::CreatePermit(p) if ids.contains(&p.project_id) => {
                Some(SubmitError::Rejected {
                    status: 500,
                    body: "internal error".into(),
                })
            }
            _ => None,
        });
    }

    pub fn fail_when<F>(&self, rule: F)
    where
        F: Fn(&HsseMutation) -> Option<SubmitError> + Send + Sync + 'static,
    {
        *lock(&self.rule) = Some(Box::new(rule));
    }

    pub fn succeed_all(&self) {
        *lock(&self.rule) = None;
    }

    /// Hold every call for `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        *lock(&self.delay) = delay;
    }

    /// `(local_id, payload)` of every call, in arrival order.
    pub fn calls(&self) -> Vec<(String, HsseMutation)> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Highest number of calls observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl IRemoteSubmitter<HsseMutation> for ScriptedSubmitter {
    async fn submit(&self, local_id: &str, payload: &HsseMutation) -> Result<SubmitReceipt, SubmitError> {
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);
        lock(&self.calls).push((local_id.to_string(), payload.clone()));

        let delay = *lock(&self.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let failure = lock(&self.rule).as_ref().and_then(|rule| rule(payload));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match failure {
            Some(e) => Err(e),
            None => Ok(SubmitReceipt {
                remote_id: Some(format!("remote-{local_id}")),
                submitted_at: now_ms(),
            }),
        }
    }
}
