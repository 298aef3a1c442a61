//! Data model of the offline queue.

mod mutation;
mod notification;
mod queued_mutation;
mod submit;
mod sync_status;

pub use mutation::{HsseMutation, IncidentDraft, MutationPayload, PermitDraft};
pub use notification::{Notification, NotificationLevel};
pub use queued_mutation::QueuedMutation;
pub use submit::SubmitReceipt;
pub use sync_status::SyncStatus;
