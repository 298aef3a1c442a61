//! Queue durability across process restarts on a file-backed store.

use std::path::Path;
use std::sync::Arc;

use proptest::prelude::*;

use hsse_core::config::OfflineConfig;
use hsse_core::constants::now_ms;
use hsse_core::models::{HsseMutation, SyncStatus};
use hsse_core::traits::{IKeyValueStore, INotifier};
use hsse_offline::{NetworkMonitor, OfflineQueue, SubmitOutcome};
use hsse_storage::StorageEngine;
use test_fixtures::{load_fixture_value, permit, RecordingNotifier, ScriptedSubmitter};

type Queue = OfflineQueue<HsseMutation, StorageEngine, ScriptedSubmitter>;

async fn open_queue(db_path: &Path, submitter: Arc<ScriptedSubmitter>, online: bool) -> Queue {
    let store = Arc::new(StorageEngine::open(db_path).unwrap());
    let notifier: Arc<dyn INotifier> = Arc::new(RecordingNotifier::new());
    OfflineQueue::open(
        store,
        submitter,
        notifier,
        NetworkMonitor::new(online),
        OfflineConfig::default(),
    )
    .await
    .unwrap()
}

fn rt() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

#[tokio::test]
async fn queued_items_survive_restart_and_sync_later() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("queue.db");
    let submitter = Arc::new(ScriptedSubmitter::new());

    // Session 1: offline capture.
    let ids = {
        let queue = open_queue(&db_path, Arc::clone(&submitter), false).await;
        let mut ids = Vec::new();
        for p in ["P1", "P2"] {
            if let SubmitOutcome::Queued { local_id } = queue.enqueue_or_submit(permit(p)).await.unwrap() {
                ids.push(local_id);
            }
        }
        ids
    };
    assert_eq!(ids.len(), 2);

    // Session 2: back online.
    let queue = open_queue(&db_path, Arc::clone(&submitter), true).await;
    let pending: Vec<String> = queue.pending().await.into_iter().map(|m| m.local_id).collect();
    assert_eq!(pending, ids);

    let report = queue.sync_all().await.unwrap();
    assert_eq!(report.synced, 2);
    let sent: Vec<String> = submitter.calls().into_iter().map(|(id, _)| id).collect();
    assert_eq!(sent.len(), 2);
    assert!(ids.iter().all(|id| sent.contains(id)));
}

#[tokio::test]
async fn reload_drops_expired_and_resets_interrupted_items() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("queue.db");
    let cfg = OfflineConfig::default();

    // Golden doc: one item far past retention, one left `syncing` by a
    // crash, one pending. Recent items are stamped relative to now.
    let mut doc = load_fixture_value("queue/persisted_queue.json");
    let recent = now_ms() - 60_000;
    for item in doc.as_array_mut().unwrap() {
        if item["created_at"] == 0 {
            item["created_at"] = recent.into();
        }
    }
    {
        let engine = StorageEngine::open(&db_path).unwrap();
        engine
            .set(&cfg.namespace, &cfg.queue_key, &doc.to_string(), None)
            .await
            .unwrap();
    }

    let queue = open_queue(&db_path, Arc::new(ScriptedSubmitter::new()), false).await;

    let items = queue.items().await;
    let ids: Vec<&str> = items.iter().map(|m| m.local_id.as_str()).collect();
    assert_eq!(ids, ["local-RECENT-1", "local-RECENT-2"]);
    assert!(items.iter().all(|m| m.sync_status == SyncStatus::Pending));
    assert_eq!(items[0].attempts, 1);

    // The repair was written back, not just applied in memory.
    drop(queue);
    let engine = StorageEngine::open(&db_path).unwrap();
    let stored = engine.get(&cfg.namespace, &cfg.queue_key).await.unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored.as_array().unwrap().len(), 2);
    assert_eq!(stored[0]["sync_status"], "pending");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Whatever mix of pending, synced, and failed items a session ends
    /// with is exactly what the next session loads.
    #[test]
    fn prop_queue_round_trips_through_restart(
        projects in prop::collection::vec("[A-Z][0-9]{1,3}", 1..6),
        failing in prop::collection::vec(any::<bool>(), 6),
        sync_first in any::<bool>(),
    ) {
        let rt = rt();
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("prop.db");

        let before = rt.block_on(async {
            let submitter = Arc::new(ScriptedSubmitter::new());
            let failing_ids: Vec<String> = projects
                .iter()
                .zip(&failing)
                .filter(|(_, f)| **f)
                .map(|(p, _)| p.clone())
                .collect();
            let failing_refs: Vec<&str> = failing_ids.iter().map(String::as_str).collect();
            submitter.fail_projects(&failing_refs);

            let queue = open_queue(&db_path, submitter, false).await;
            for p in &projects {
                queue.enqueue_or_submit(permit(p)).await.unwrap();
            }
            if sync_first {
                queue.network().go_online();
                queue.sync_all().await.unwrap();
            }
            queue.items().await
        });

        let after = rt.block_on(async {
            let queue = open_queue(&db_path, Arc::new(ScriptedSubmitter::new()), false).await;
            queue.items().await
        });

        prop_assert_eq!(before.len(), projects.len());
        prop_assert_eq!(after, before);
    }
}
