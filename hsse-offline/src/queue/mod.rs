//! The offline queue: captures writes while offline, replays them on reconnect.
//!
//! The item list is held in memory behind an async mutex and mirrored to the
//! store as a single JSON document after every change. The mutex is never
//! held across a network call, so enqueue/discard stay responsive while a
//! sync pass is in flight.

mod auto_sync;
mod persistence;
mod report;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Instant;

use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinSet;
use tracing::Instrument;

use hsse_core::config::OfflineConfig;
use hsse_core::constants::{generate_local_id, now_ms};
use hsse_core::errors::{HsseError, HsseResult};
use hsse_core::models::{MutationPayload, QueuedMutation, SyncStatus};
use hsse_core::traits::{IKeyValueStore, INotifier, IRemoteSubmitter};
use hsse_observability::{events, retry_span, sync_span};

use crate::network::NetworkMonitor;
use crate::notify;

use persistence::QueueSlot;

pub use report::{QueueStatus, SubmitOutcome, SyncReport, SyncRunStatus};

/// Marker for "never synced" in `last_sync_at`.
const NEVER: i64 = i64::MIN;

/// Holds the in-progress flag for the lifetime of one sync pass.
struct SyncGuard<'a>(&'a AtomicBool);

impl<'a> SyncGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Ids moved to `syncing` by a pass or a retry that has not recorded an
/// outcome yet. Dropped unreleased (the future was cancelled), the ids are
/// handed back and returned to `pending` on the next access to the list.
struct ClaimGuard<'a> {
    abandoned: &'a StdMutex<Vec<String>>,
    ids: Vec<String>,
}

impl<'a> ClaimGuard<'a> {
    fn new(abandoned: &'a StdMutex<Vec<String>>, ids: Vec<String>) -> Self {
        Self { abandoned, ids }
    }

    /// Outcomes are recorded; nothing to hand back.
    fn release(mut self) {
        self.ids.clear();
    }
}

impl Drop for ClaimGuard<'_> {
    fn drop(&mut self) {
        if self.ids.is_empty() {
            return;
        }
        self.abandoned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .append(&mut self.ids);
    }
}

/// The offline mutation queue for one payload type and one store namespace.
pub struct OfflineQueue<M, S, R> {
    store: Arc<S>,
    submitter: Arc<R>,
    notifier: Arc<dyn INotifier>,
    network: NetworkMonitor,
    config: OfflineConfig,
    slot: QueueSlot,
    items: Mutex<Vec<QueuedMutation<M>>>,
    syncing: AtomicBool,
    last_sync_at: AtomicI64,
    abandoned: StdMutex<Vec<String>>,
}

impl<M, S, R> OfflineQueue<M, S, R>
where
    M: MutationPayload,
    S: IKeyValueStore,
    R: IRemoteSubmitter<M>,
{
    /// Load the persisted queue and repair it: items past retention are
    /// dropped, items left `syncing` by an interrupted run go back to
    /// `pending`.
    pub async fn open(
        store: Arc<S>,
        submitter: Arc<R>,
        notifier: Arc<dyn INotifier>,
        network: NetworkMonitor,
        config: OfflineConfig,
    ) -> HsseResult<Self> {
        let slot = QueueSlot::from_config(&config);
        let mut items: Vec<QueuedMutation<M>> = slot.load(store.as_ref()).await?;
        let recovery = persistence::recover(&mut items, now_ms(), slot.retention_ms());
        if recovery.changed() {
            events::queue_recovered(recovery.expired, recovery.interrupted);
            slot.save(store.as_ref(), items.as_slice()).await?;
        }
        tracing::debug!(
            namespace = %slot.namespace,
            loaded = items.len(),
            "offline queue: opened"
        );

        Ok(Self {
            store,
            submitter,
            notifier,
            network,
            config,
            slot,
            items: Mutex::new(items),
            syncing: AtomicBool::new(false),
            last_sync_at: AtomicI64::new(NEVER),
            abandoned: StdMutex::new(Vec::new()),
        })
    }

    /// Submit directly when online; otherwise queue for later.
    ///
    /// A rejection while online is returned as `HsseError::Submission` and is
    /// not retried. A store failure while queueing is returned as-is and
    /// leaves nothing queued.
    pub async fn enqueue_or_submit(&self, payload: M) -> HsseResult<SubmitOutcome> {
        if !self.network.is_online() {
            let local_id = self.enqueue(payload).await?;
            return Ok(SubmitOutcome::Queued { local_id });
        }

        let local_id = generate_local_id();
        match self.submitter.submit(&local_id, &payload).await {
            Ok(receipt) => Ok(SubmitOutcome::Submitted { receipt }),
            Err(e) => {
                events::direct_submit_failed(&payload.label(), &e.to_string());
                Err(HsseError::Submission(e))
            }
        }
    }

    /// Queue a write regardless of reachability. Returns its local id once
    /// the updated list is persisted.
    pub async fn enqueue(&self, payload: M) -> HsseResult<String> {
        let label = payload.label();
        let mut items = self.lock_items().await;

        let local_id = loop {
            let candidate = generate_local_id();
            if !items.iter().any(|i| i.local_id == candidate) {
                break candidate;
            }
        };
        items.push(QueuedMutation::new(local_id.clone(), payload, now_ms()));

        if let Err(e) = self.slot.save(self.store.as_ref(), items.as_slice()).await {
            items.pop();
            return Err(e);
        }
        let queue_len = items.len();
        drop(items);

        events::mutation_queued(&local_id, &label, queue_len);
        self.notifier.notify(notify::queued_offline(&label));
        Ok(local_id)
    }

    /// Deliver every pending or failed item concurrently, then write the
    /// updated list back once.
    ///
    /// Skipped (no error) when offline, when another pass is running, or
    /// when nothing is waiting. Per-item delivery failures are recorded on
    /// the item; only a write-back failure is returned as an error.
    pub async fn sync_all(&self) -> HsseResult<SyncReport> {
        if !self.network.is_online() {
            return Ok(self.skip(SyncRunStatus::Offline));
        }
        let Some(_guard) = SyncGuard::acquire(&self.syncing) else {
            return Ok(self.skip(SyncRunStatus::AlreadyRunning));
        };

        let (batch, claim) = self.claim_deliverable().await;
        if batch.is_empty() {
            claim.release();
            return Ok(self.skip(SyncRunStatus::NothingToSync));
        }

        let span = sync_span!(self.slot.namespace, batch.len());
        self.deliver_batch(batch, claim).instrument(span).await
    }

    /// Lock the item list, first returning items abandoned by a cancelled
    /// pass or retry to `pending`.
    async fn lock_items(&self) -> MutexGuard<'_, Vec<QueuedMutation<M>>> {
        let mut items = self.items.lock().await;
        let abandoned = std::mem::take(
            &mut *self
                .abandoned
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        if !abandoned.is_empty() {
            let reset = items
                .iter_mut()
                .filter(|i| abandoned.contains(&i.local_id))
                .map(QueuedMutation::reset_interrupted)
                .filter(|&reset| reset)
                .count();
            if reset > 0 {
                tracing::warn!(reset, "offline queue: returned cancelled deliveries to pending");
            }
        }
        items
    }

    /// Move every deliverable item to `syncing` and hand back what to send,
    /// with a guard over the claimed ids.
    async fn claim_deliverable(&self) -> (Vec<(String, M)>, ClaimGuard<'_>) {
        let now = now_ms();
        let mut items = self.lock_items().await;
        let batch: Vec<(String, M)> = items
            .iter_mut()
            .filter(|item| item.sync_status.is_deliverable())
            .filter_map(|item| {
                item.begin_attempt(now).ok()?;
                Some((item.local_id.clone(), item.payload.clone()))
            })
            .collect();
        let ids = batch.iter().map(|(id, _)| id.clone()).collect();
        (batch, ClaimGuard::new(&self.abandoned, ids))
    }

    async fn deliver_batch(&self, batch: Vec<(String, M)>, claim: ClaimGuard<'_>) -> HsseResult<SyncReport> {
        let started = Instant::now();
        let mut unreported: HashSet<String> = batch.iter().map(|(id, _)| id.clone()).collect();

        let mut tasks = JoinSet::new();
        for (local_id, payload) in batch {
            let submitter = Arc::clone(&self.submitter);
            tasks.spawn(async move {
                let result = submitter.submit(&local_id, &payload).await;
                (local_id, result)
            });
        }

        let mut outcomes = Vec::with_capacity(unreported.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => tracing::error!("offline queue: delivery task aborted: {e}"),
            }
        }

        let mut report = SyncReport::default();
        let mut items = self.lock_items().await;

        for (local_id, result) in outcomes {
            unreported.remove(&local_id);
            // Discarded while in flight.
            let Some(item) = items.iter_mut().find(|i| i.local_id == local_id) else {
                continue;
            };
            match result {
                Ok(_) => {
                    item.mark_synced()?;
                    report.synced += 1;
                }
                Err(e) => {
                    let reason = e.to_string();
                    events::item_sync_failed(&local_id, item.attempts, &reason);
                    item.mark_failed(reason.clone())?;
                    report.failed += 1;
                    report.failures.push((local_id, reason));
                }
            }
        }

        for local_id in unreported {
            if let Some(item) = items.iter_mut().find(|i| i.local_id == local_id) {
                let reason = "delivery task aborted".to_string();
                item.mark_failed(reason.clone())?;
                report.failed += 1;
                report.failures.push((local_id, reason));
            }
        }
        claim.release();

        self.slot.save(self.store.as_ref(), items.as_slice()).await?;
        drop(items);

        self.last_sync_at.store(now_ms(), Ordering::Release);
        events::sync_completed(report.synced, report.failed, started.elapsed().as_millis());
        self.notifier
            .notify(notify::sync_summary(report.synced, report.failed));
        Ok(report)
    }

    fn skip(&self, status: SyncRunStatus) -> SyncReport {
        events::sync_skipped(status.as_str());
        SyncReport::skipped(status)
    }

    /// Retry one item now. Returns its resulting status (`Synced` or
    /// `Failed`); other items are untouched.
    ///
    /// Errors with `NotFound` for an unknown id, `Offline` when unreachable,
    /// and `InvalidTransition` when the item is already synced or mid-sync.
    pub async fn retry(&self, local_id: &str) -> HsseResult<SyncStatus> {
        let payload = {
            let mut items = self.lock_items().await;
            let item = items
                .iter_mut()
                .find(|i| i.local_id == local_id)
                .ok_or_else(|| not_found(local_id))?;
            if !self.network.is_online() {
                return Err(HsseError::Offline);
            }
            item.begin_attempt(now_ms())?;
            item.payload.clone()
        };
        let claim = ClaimGuard::new(&self.abandoned, vec![local_id.to_string()]);

        let result = self
            .submitter
            .submit(local_id, &payload)
            .instrument(retry_span!(local_id))
            .await;

        let mut items = self.lock_items().await;
        let item = items
            .iter_mut()
            .find(|i| i.local_id == local_id)
            .ok_or_else(|| not_found(local_id))?;
        let label = item.payload.label();
        let notification = match result {
            Ok(_) => {
                item.mark_synced()?;
                notify::retry_succeeded(&label)
            }
            Err(e) => {
                let reason = e.to_string();
                events::item_sync_failed(local_id, item.attempts, &reason);
                item.mark_failed(reason.clone())?;
                notify::retry_failed(&label, &reason)
            }
        };
        let status = item.sync_status;
        claim.release();

        self.slot.save(self.store.as_ref(), items.as_slice()).await?;
        drop(items);

        self.notifier.notify(notification);
        Ok(status)
    }

    /// Remove an item whatever its status. Returns whether it existed.
    pub async fn discard(&self, local_id: &str) -> HsseResult<bool> {
        let mut items = self.lock_items().await;
        let Some(index) = items.iter().position(|i| i.local_id == local_id) else {
            return Ok(false);
        };
        let removed = items.remove(index);
        if let Err(e) = self.slot.save(self.store.as_ref(), items.as_slice()).await {
            items.insert(index, removed);
            return Err(e);
        }
        tracing::info!(local_id = %local_id, "offline queue: item discarded");
        Ok(true)
    }

    /// Prune synced items from storage. Returns how many were removed.
    pub async fn clear_synced(&self) -> HsseResult<usize> {
        let mut items = self.lock_items().await;
        let before = items.len();
        let kept: Vec<QueuedMutation<M>> = items.iter().filter(|i| i.is_active()).cloned().collect();
        let removed = before - kept.len();
        if removed > 0 {
            self.slot.save(self.store.as_ref(), &kept).await?;
            *items = kept;
        }
        Ok(removed)
    }

    /// Active items (not synced), in enqueue order.
    pub async fn pending(&self) -> Vec<QueuedMutation<M>> {
        self.lock_items()
            .await
            .iter()
            .filter(|i| i.is_active())
            .cloned()
            .collect()
    }

    pub async fn pending_count(&self) -> usize {
        self.lock_items().await.iter().filter(|i| i.is_active()).count()
    }

    /// Every retained item, synced ones included.
    pub async fn items(&self) -> Vec<QueuedMutation<M>> {
        self.lock_items().await.clone()
    }

    pub async fn get(&self, local_id: &str) -> Option<QueuedMutation<M>> {
        self.lock_items()
            .await
            .iter()
            .find(|i| i.local_id == local_id)
            .cloned()
    }

    pub async fn status(&self) -> QueueStatus {
        let items = self.lock_items().await;
        let count = |s: SyncStatus| items.iter().filter(|i| i.sync_status == s).count();
        let last = self.last_sync_at.load(Ordering::Acquire);
        QueueStatus {
            online: self.network.is_online(),
            syncing: self.is_syncing(),
            pending: items.iter().filter(|i| i.is_active()).count(),
            failed: count(SyncStatus::Failed),
            synced_retained: count(SyncStatus::Synced),
            last_sync_at: (last != NEVER).then_some(last),
        }
    }

    /// Whether a `sync_all` pass is in progress.
    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    pub fn network(&self) -> &NetworkMonitor {
        &self.network
    }

    pub fn config(&self) -> &OfflineConfig {
        &self.config
    }
}

fn not_found(local_id: &str) -> HsseError {
    HsseError::NotFound {
        local_id: local_id.to_string(),
    }
}
