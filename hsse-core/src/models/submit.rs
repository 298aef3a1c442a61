use serde::{Deserialize, Serialize};

/// Acknowledgement from the remote write endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    /// Server-assigned id of the created record, when the endpoint returns one.
    pub remote_id: Option<String>,
    /// Epoch milliseconds the submission was acknowledged.
    pub submitted_at: i64,
}
