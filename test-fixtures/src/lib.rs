//! Test doubles and fixture loading shared by the HSSE crates' tests.
//!
//! Provides a scripted remote submitter, a recording notifier, an in-memory
//! store that can be told to fail, sample payloads, and typed loading of the
//! golden JSON files under `test-fixtures/golden/`.

mod notifier;
mod store;
mod submitter;

pub use notifier::RecordingNotifier;
pub use store::FlakyStore;
pub use submitter::ScriptedSubmitter;

use std::future::Future;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Map;

use hsse_core::models::{HsseMutation, IncidentDraft, PermitDraft};

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    while !path.join("test-fixtures").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Absolute path to a file under `test-fixtures/golden/`.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join("golden").join(relative_path)
}

/// Load and deserialize a golden JSON file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixture_path(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a golden file as raw JSON.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

/// A minimal permit-to-work draft for `project_id`.
pub fn permit(project_id: &str) -> HsseMutation {
    HsseMutation::CreatePermit(PermitDraft {
        project_id: project_id.to_string(),
        permit_type: "hot_work".to_string(),
        work_description: format!("Test work for {project_id}"),
        location: Some("Level 2".to_string()),
        planned_start: None,
        planned_end: None,
        extra: Map::new(),
    })
}

/// A minimal incident report.
pub fn incident(site_id: &str, title: &str) -> HsseMutation {
    HsseMutation::ReportIncident(IncidentDraft {
        site_id: site_id.to_string(),
        title: title.to_string(),
        severity: "minor".to_string(),
        description: None,
        occurred_at: None,
        extra: Map::new(),
    })
}

/// Poll `check` every 10ms until it returns true or `timeout` elapses.
pub async fn eventually<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Lock ignoring poison; a panicking test thread must not cascade.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
