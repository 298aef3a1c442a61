//! # hsse-observability
//!
//! `tracing` subscriber setup plus the named events and spans emitted by the
//! offline queue.

pub mod tracing_setup;

pub use tracing_setup::{events, init_tracing, init_tracing_with_filter};
