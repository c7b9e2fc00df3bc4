//! Shared utilities for coinpaint.

pub mod logging;

pub use logging::init_tracing;
