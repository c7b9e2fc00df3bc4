//! Nullable ledger reader — an in-memory chain fixture.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use coinpaint_reader::{LedgerReader, ReaderError};
use coinpaint_types::{Address, TxId, TxView};

/// An in-memory `LedgerReader` built from transactions added by the test.
///
/// Address histories are derived the way a real explorer derives them: a
/// transaction appears in the history of every address it pays, and of every
/// address whose output it spends. Lookups count calls and can be switched
/// to fail, so tests can assert caching and fallback behavior.
#[derive(Default)]
pub struct NullReader {
    transactions: Mutex<HashMap<TxId, TxView>>,
    histories: Mutex<HashMap<Address, Vec<TxId>>>,
    transaction_calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl NullReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transaction to the fixture chain.
    ///
    /// Transactions must be added in ledger order so spent prevouts resolve
    /// when histories are indexed.
    pub fn add_transaction(&self, tx: TxView) {
        let mut histories = self.histories.lock().unwrap();
        let mut transactions = self.transactions.lock().unwrap();

        for input in &tx.inputs {
            if let Some(prev) = transactions.get(&input.prevout.txid) {
                if let Some(out) = prev.output(input.prevout.vout) {
                    let history = histories.entry(out.address.clone()).or_default();
                    if !history.contains(&tx.txid) {
                        history.push(tx.txid.clone());
                    }
                }
            }
        }
        for out in &tx.outputs {
            let history = histories.entry(out.address.clone()).or_default();
            if !history.contains(&tx.txid) {
                history.push(tx.txid.clone());
            }
        }

        transactions.insert(tx.txid.clone(), tx);
    }

    /// Make every subsequent lookup fail with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// How many `transaction` lookups have been served (for cache tests).
    pub fn transaction_calls(&self) -> usize {
        self.transaction_calls.load(Ordering::SeqCst)
    }
}

impl LedgerReader for NullReader {
    async fn transaction(&self, txid: &TxId) -> Result<TxView, ReaderError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ReaderError::Unavailable("null reader is offline".into()));
        }
        self.transaction_calls.fetch_add(1, Ordering::SeqCst);
        self.transactions
            .lock()
            .unwrap()
            .get(txid)
            .cloned()
            .ok_or_else(|| ReaderError::TxNotFound(txid.clone()))
    }

    async fn address_transactions(&self, address: &Address) -> Result<Vec<TxId>, ReaderError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ReaderError::Unavailable("null reader is offline".into()));
        }
        Ok(self
            .histories
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .unwrap_or_default())
    }
}
