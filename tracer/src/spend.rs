//! Spend location: which transaction, if any, consumes an outpoint.

use coinpaint_reader::LedgerReader;
use coinpaint_types::{OutPoint, TxId};

use crate::error::TraceError;

/// Find the transaction spending `outpoint`, or `None` if it is unspent.
///
/// Resolves the outpoint's destination address via its owning transaction,
/// then scans that address's full history for a transaction whose inputs
/// reference the outpoint exactly. By ledger construction at most one
/// transaction can spend it, so the first match is the answer.
///
/// This is the dominant I/O cost of a trace — one reader round trip per
/// candidate transaction — which is why [`Tracer`](crate::trace::Tracer)
/// runs it behind a per-run cache.
pub async fn find_spending_tx<R: LedgerReader + Sync>(
    reader: &R,
    outpoint: &OutPoint,
) -> Result<Option<TxId>, TraceError> {
    let owning = reader.transaction(&outpoint.txid).await?;
    let output = owning
        .output(outpoint.vout)
        .ok_or_else(|| TraceError::BadOutputIndex(outpoint.clone()))?;

    let history = reader.address_transactions(&output.address).await?;
    for candidate in history {
        // A transaction cannot spend its own output.
        if candidate == outpoint.txid {
            continue;
        }
        let tx = reader.transaction(&candidate).await?;
        if tx.spends(outpoint) {
            return Ok(Some(candidate));
        }
    }

    Ok(None)
}
