//! # hsse-core
//!
//! Foundation crate for the HSSE offline mutation queue.
//! Defines the queued-mutation model, sync status state machine, errors,
//! config, and the traits at the storage / transport / notification seams.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::HsseConfig;
pub use errors::{HsseError, HsseResult};
pub use models::{
    HsseMutation, IncidentDraft, MutationPayload, Notification, NotificationLevel, PermitDraft,
    QueuedMutation, SubmitReceipt, SyncStatus,
};
