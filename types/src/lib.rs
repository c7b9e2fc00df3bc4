//! Fundamental types for coinpaint.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: transaction ids, addresses, amounts, outpoints, decoded
//! transaction views, and asset/holder records.

pub mod address;
pub mod amount;
pub mod asset;
pub mod error;
pub mod holder;
pub mod outpoint;
pub mod txid;
pub mod txview;

pub use address::Address;
pub use amount::Amount;
pub use asset::Asset;
pub use error::TypeError;
pub use holder::Holder;
pub use outpoint::OutPoint;
pub use txid::TxId;
pub use txview::{TxIn, TxOut, TxView};
