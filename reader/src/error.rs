//! Ledger Reader error types.

use coinpaint_types::{TxId, TypeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReaderError {
    /// The transaction id does not resolve on this source. Not inherently
    /// fatal — unspent detection relies on lookups that come up empty.
    #[error("transaction not found: {0}")]
    TxNotFound(TxId),

    /// This source lacks the capability (e.g. bitcoind has no address index).
    #[error("{0} not supported by this data source")]
    Unsupported(&'static str),

    /// Transport-level failure; the fallback combinator may retry the call
    /// against the secondary source.
    #[error("data source unavailable: {0}")]
    Unavailable(String),

    /// The source answered with an RPC-level error.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The response decoded, but a field in it did not.
    #[error("malformed response: {0}")]
    Decode(#[from] TypeError),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ReaderError {
    /// Whether a fallback source should be consulted after this error.
    ///
    /// `TxNotFound` is an answer, not a failure, and must be identical
    /// whichever source produced it.
    pub fn should_fall_back(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Unsupported(_))
    }
}
