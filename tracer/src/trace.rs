//! The provenance walk from a root output to the current holder set.

use std::collections::HashSet;

use coinpaint_reader::{CachedReader, LedgerReader};
use coinpaint_types::{Amount, Holder, OutPoint, TxId};

use crate::error::TraceError;
use crate::lost_track::LostTrackSet;
use crate::relevance::relevant_outputs;
use crate::spend::find_spending_tx;

/// Defensive bound on spend-chain depth. Real spend histories are a forest;
/// hitting this means the data source is feeding us garbage.
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Result of one trace run.
#[derive(Clone, Debug)]
pub struct TraceReport {
    /// Current holders, in branch order.
    pub holders: Vec<Holder>,
    /// Transactions where tracking was suspended and never recovered.
    /// Non-empty means the holder total undercounts the root value.
    pub lost_track: Vec<TxId>,
}

impl TraceReport {
    /// Sum of all holder amounts.
    pub fn total(&self) -> Amount {
        self.holders.iter().map(|h| h.amount).sum()
    }

    /// True when every branch resolved to a holder.
    pub fn is_complete(&self) -> bool {
        self.lost_track.is_empty()
    }
}

/// Walks the spend graph forward from a root output.
pub struct Tracer<R> {
    reader: R,
    max_depth: usize,
}

impl<R: LedgerReader + Sync> Tracer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Trace `root` to the current holder set.
    ///
    /// Depth-first over an explicit work stack. Per branch, the outpoint is
    /// either unspent (emit a terminal holder), spent with no relevant
    /// outputs (record the spender as lost track, end the branch), or spent
    /// with relevant outputs (descend into each, in order).
    ///
    /// The lost-track set and the transaction cache are scoped to this call;
    /// nothing leaks across runs or across assets. Any reader failure, a
    /// revisited outpoint, or a depth overrun aborts the whole run — no
    /// partial holder lists.
    pub async fn trace(&self, root: &OutPoint) -> Result<TraceReport, TraceError> {
        let reader = CachedReader::new(&self.reader);
        let mut lost_track = LostTrackSet::new();
        let mut visited: HashSet<OutPoint> = HashSet::new();
        let mut holders = Vec::new();
        let mut stack = vec![(root.clone(), 0usize)];

        while let Some((outpoint, depth)) = stack.pop() {
            if depth >= self.max_depth {
                return Err(TraceError::DepthExceeded(self.max_depth));
            }
            if !visited.insert(outpoint.clone()) {
                return Err(TraceError::CycleDetected(outpoint));
            }

            match find_spending_tx(&reader, &outpoint).await? {
                None => {
                    let tx = reader.transaction(&outpoint.txid).await?;
                    let out = tx
                        .output(outpoint.vout)
                        .ok_or_else(|| TraceError::BadOutputIndex(outpoint.clone()))?;
                    tracing::debug!(%outpoint, address = %out.address, "terminal holder");
                    holders.push(Holder::new(out.address.clone(), out.value, outpoint));
                }
                Some(spending_txid) => {
                    let spending = reader.transaction(&spending_txid).await?;
                    let relevant =
                        relevant_outputs(&reader, &spending, &outpoint, &mut lost_track).await?;
                    if relevant.is_empty() {
                        tracing::debug!(
                            %outpoint,
                            spending = %spending_txid,
                            "color lost, suspending branch"
                        );
                        lost_track.insert(spending_txid);
                    } else {
                        // Reverse push keeps depth-first output order.
                        for next in relevant.into_iter().rev() {
                            stack.push((next, depth + 1));
                        }
                    }
                }
            }
        }

        tracing::debug!(
            %root,
            holders = holders.len(),
            unrecovered = lost_track.len(),
            cached = reader.cached_transactions(),
            "trace complete"
        );

        Ok(TraceReport {
            holders,
            lost_track: lost_track.into_remaining(),
        })
    }
}
