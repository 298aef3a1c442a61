//! Transport to the remote write endpoint.

mod http_submitter;

pub use http_submitter::{backoff_for, parse_remote_id, HttpSubmitter};
