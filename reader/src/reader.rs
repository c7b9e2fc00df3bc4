//! The Ledger Reader trait.

use coinpaint_types::{Address, TxId, TxView};

use crate::error::ReaderError;

/// Read access to the public ledger.
///
/// The two capabilities the tracer needs: resolve a transaction id to its
/// decoded view, and resolve an address to its full transaction history.
/// Every call is a blocking round trip from the tracer's point of view and
/// the only suspension point in a trace; callers bound total latency by
/// dropping the future.
///
/// Implementations must not surface partial answers: a history lookup either
/// returns the complete list of transaction ids touching the address or
/// fails.
#[allow(async_fn_in_trait)]
pub trait LedgerReader {
    async fn transaction(&self, txid: &TxId) -> Result<TxView, ReaderError>;

    async fn address_transactions(&self, address: &Address) -> Result<Vec<TxId>, ReaderError>;
}

impl<R: LedgerReader + Sync> LedgerReader for &R {
    async fn transaction(&self, txid: &TxId) -> Result<TxView, ReaderError> {
        (**self).transaction(txid).await
    }

    async fn address_transactions(&self, address: &Address) -> Result<Vec<TxId>, ReaderError> {
        (**self).address_transactions(address).await
    }
}
