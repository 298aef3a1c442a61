//! # hsse-offline
//!
//! Offline mutation queue: writes attempted while the network is down are
//! persisted to the local store and replayed against the remote endpoint
//! when connectivity returns, with per-item sync status (pending, syncing,
//! synced, failed). Delivery is at-least-once; the remote is not assumed to
//! deduplicate.
//!
//! Also hosts the form-progress side channel, the network-status monitor,
//! the default notification sink, and the HTTP transport (feature `remote`).

pub mod form_progress;
pub mod network;
pub mod notify;
pub mod queue;
pub mod transport;

pub use form_progress::FormProgressStore;
pub use network::NetworkMonitor;
pub use notify::TracingNotifier;
pub use queue::{OfflineQueue, QueueStatus, SubmitOutcome, SyncReport, SyncRunStatus};
pub use transport::HttpSubmitter;
