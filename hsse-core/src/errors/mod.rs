//! Error taxonomy for the HSSE workspace.
//!
//! Delivery failures during background sync are recorded on the queued item
//! and never surface here. What does surface: direct-submit rejections while
//! online, persistence failures, and misuse of the queue API.

mod config_error;
mod storage_error;
mod submit_error;

pub use config_error::ConfigError;
pub use storage_error::StorageError;
pub use submit_error::SubmitError;

use crate::models::SyncStatus;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum HsseError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    #[error("submission failed: {0}")]
    Submission(#[from] SubmitError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("queued mutation not found: {local_id}")]
    NotFound { local_id: String },

    #[error("network unreachable")]
    Offline,

    #[error("invalid sync status transition: {from} -> {to}")]
    InvalidTransition { from: SyncStatus, to: SyncStatus },
}

impl From<serde_json::Error> for HsseError {
    fn from(e: serde_json::Error) -> Self {
        HsseError::Serialization {
            reason: e.to_string(),
        }
    }
}

impl HsseError {
    /// Whether this error means the local store could not be written or read.
    pub fn is_persistence(&self) -> bool {
        matches!(self, HsseError::Storage(_) | HsseError::Serialization { .. })
    }
}

pub type HsseResult<T> = Result<T, HsseError>;
