//! Traits at the seams: local store, remote endpoint, notification sink.

mod key_value_store;
mod notifier;
mod remote_submitter;

pub use key_value_store::IKeyValueStore;
pub use notifier::INotifier;
pub use remote_submitter::IRemoteSubmitter;
