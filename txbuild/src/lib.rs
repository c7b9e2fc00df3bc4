//! Transaction building and broadcast for asset transfers.
//!
//! coinpaint never constructs or signs transactions itself: the node's
//! `createrawtransaction` / `signrawtransactionwithwallet` /
//! `sendrawtransaction` RPCs do all of it, with keys staying in the node
//! wallet. This crate is the thin typed surface over those calls.

pub mod builder;
pub mod error;

pub use builder::{NodeBroadcaster, TransferOutcome, TxSpec};
pub use error::BuildError;
