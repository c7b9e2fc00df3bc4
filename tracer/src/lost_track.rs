//! Lost-track bookkeeping for one trace run.

use std::collections::HashSet;

use coinpaint_types::TxId;

/// Transactions where the tracked color could not be placed on any output.
///
/// Scoped to a single trace run and discarded with it — never persisted,
/// never shared between runs. An entry is removed the moment a later sibling
/// input consumes it in a value merge, so recovery never double-counts.
#[derive(Debug, Default)]
pub struct LostTrackSet {
    entries: HashSet<TxId>,
}

impl LostTrackSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, txid: TxId) -> bool {
        self.entries.insert(txid)
    }

    pub fn remove(&mut self, txid: &TxId) -> bool {
        self.entries.remove(txid)
    }

    pub fn contains(&self, txid: &TxId) -> bool {
        self.entries.contains(txid)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Consume the set, returning the unrecovered entries in a stable order.
    pub fn into_remaining(self) -> Vec<TxId> {
        let mut remaining: Vec<TxId> = self.entries.into_iter().collect();
        remaining.sort();
        remaining
    }
}
