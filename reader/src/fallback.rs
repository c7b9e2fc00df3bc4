//! Transparent primary → secondary fallback.

use coinpaint_types::{Address, TxId, TxView};

use crate::error::ReaderError;
use crate::reader::LedgerReader;

/// Composes two readers into one capability.
///
/// The primary (trusted) source answers first; when it is unavailable or
/// lacks the capability, the secondary (public) source is consulted. Callers
/// never learn which source answered. `TxNotFound` propagates from the
/// primary untouched — it is an answer, not an outage.
pub struct FallbackReader<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> FallbackReader<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P: LedgerReader + Sync, S: LedgerReader + Sync> LedgerReader for FallbackReader<P, S> {
    async fn transaction(&self, txid: &TxId) -> Result<TxView, ReaderError> {
        match self.primary.transaction(txid).await {
            Err(e) if e.should_fall_back() => {
                tracing::warn!(%txid, error = %e, "primary source failed, trying secondary");
                self.secondary.transaction(txid).await
            }
            other => other,
        }
    }

    async fn address_transactions(&self, address: &Address) -> Result<Vec<TxId>, ReaderError> {
        match self.primary.address_transactions(address).await {
            Err(e) if e.should_fall_back() => {
                // Expected path when the primary is bitcoind, which has no
                // address index; keep the noise level down.
                tracing::debug!(%address, error = %e, "address history via secondary source");
                self.secondary.address_transactions(address).await
            }
            other => other,
        }
    }
}
