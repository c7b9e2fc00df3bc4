//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies are abstracted behind traits; this crate provides
//! test-friendly implementations that return programmable, deterministic
//! answers and never touch the network. Swap them in for the real readers in
//! tests.

pub mod reader;

pub use reader::NullReader;
