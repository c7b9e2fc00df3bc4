//! Per-run memoizing reader.

use std::collections::HashMap;
use std::sync::Mutex;

use coinpaint_types::{Address, TxId, TxView};

use crate::error::ReaderError;
use crate::reader::LedgerReader;

/// Memoizes successful lookups for the lifetime of the wrapper.
///
/// The spend locator refetches the same transactions many times while
/// scanning address histories; a cache scoped to one trace run removes that
/// cost without ever serving stale history across runs. Failures are not
/// cached.
pub struct CachedReader<R> {
    inner: R,
    transactions: Mutex<HashMap<TxId, TxView>>,
    histories: Mutex<HashMap<Address, Vec<TxId>>>,
}

impl<R> CachedReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            transactions: Mutex::new(HashMap::new()),
            histories: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached transactions (for instrumentation).
    pub fn cached_transactions(&self) -> usize {
        self.transactions.lock().map(|m| m.len()).unwrap_or(0)
    }
}

impl<R: LedgerReader + Sync> LedgerReader for CachedReader<R> {
    async fn transaction(&self, txid: &TxId) -> Result<TxView, ReaderError> {
        if let Ok(cache) = self.transactions.lock() {
            if let Some(tx) = cache.get(txid) {
                return Ok(tx.clone());
            }
        }
        let tx = self.inner.transaction(txid).await?;
        if let Ok(mut cache) = self.transactions.lock() {
            cache.insert(txid.clone(), tx.clone());
        }
        Ok(tx)
    }

    async fn address_transactions(&self, address: &Address) -> Result<Vec<TxId>, ReaderError> {
        if let Ok(cache) = self.histories.lock() {
            if let Some(history) = cache.get(address) {
                return Ok(history.clone());
            }
        }
        let history = self.inner.address_transactions(address).await?;
        if let Ok(mut cache) = self.histories.lock() {
            cache.insert(address.clone(), history.clone());
        }
        Ok(history)
    }
}
