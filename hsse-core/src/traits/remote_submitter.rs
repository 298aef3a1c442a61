//! The remote create-mutation endpoint.

use std::future::Future;

use crate::errors::SubmitError;
use crate::models::SubmitReceipt;

/// Delivers one write to the remote system.
///
/// Idempotency is not guaranteed: a retry after an ambiguous failure
/// (request sent, response lost) may create a duplicate. `local_id` is
/// passed so implementations can forward it as a dedupe hint.
pub trait IRemoteSubmitter<M>: Send + Sync + 'static {
    fn submit(
        &self,
        local_id: &str,
        payload: &M,
    ) -> impl Future<Output = Result<SubmitReceipt, SubmitError>> + Send;
}
