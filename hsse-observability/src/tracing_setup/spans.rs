//! Span definitions per queue operation.

/// Span around one `sync_all` pass.
#[macro_export]
macro_rules! sync_span {
    ($namespace:expr, $batch_size:expr) => {
        tracing::info_span!("hsse.sync", namespace = %$namespace, batch_size = $batch_size)
    };
}

/// Span around a single-item retry.
#[macro_export]
macro_rules! retry_span {
    ($local_id:expr) => {
        tracing::info_span!("hsse.retry", local_id = %$local_id)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const SYNC: &str = "hsse.sync";
    pub const RETRY: &str = "hsse.retry";
}
