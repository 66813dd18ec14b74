//! Logging setup. Library code only emits `tracing` events; installing a
//! subscriber is left to the host or to [`init_tracing`].

pub mod setup;

pub use setup::{filter_from, init_tracing};
