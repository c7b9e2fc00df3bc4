//! Relevant-output resolution with lost-track recovery.

use coinpaint_reader::LedgerReader;
use coinpaint_types::{Amount, OutPoint, TxView};

use crate::color::assign_colors;
use crate::error::TraceError;
use crate::lost_track::LostTrackSet;

/// Determine which outputs of `spending` inherit the color tracked through
/// `tracked`.
///
/// Builds the input value vector by resolving each input's prevout, locates
/// the tracked input's bucket, applies lost-track recovery, then runs the
/// order-based coloring and collects every output assigned to the tracked
/// bucket.
///
/// Recovery: when a sibling input spends an output of a transaction in
/// `lost_track`, that branch's value previously failed to land anywhere; its
/// value is merged into the tracked bucket, the sibling's own bucket is
/// zeroed, and the entry is consumed. This re-attaches the lost value to the
/// branch currently being traced regardless of which branch economically
/// owned it — a known approximation, kept deliberately.
///
/// An empty result means the color could not be placed; the caller records
/// the spending transaction in `lost_track`.
pub async fn relevant_outputs<R: LedgerReader + Sync>(
    reader: &R,
    spending: &TxView,
    tracked: &OutPoint,
    lost_track: &mut LostTrackSet,
) -> Result<Vec<OutPoint>, TraceError> {
    let mut input_values = Vec::with_capacity(spending.inputs.len());
    let mut tracked_index = None;

    for (index, input) in spending.inputs.iter().enumerate() {
        if &input.prevout == tracked {
            tracked_index = Some(index);
        }
        let prev = reader.transaction(&input.prevout.txid).await?;
        let out = prev
            .output(input.prevout.vout)
            .ok_or_else(|| TraceError::BadOutputIndex(input.prevout.clone()))?;
        input_values.push(out.value);
    }

    let tracked_index =
        tracked_index.ok_or_else(|| TraceError::TrackedInputMissing(tracked.clone()))?;

    for (index, input) in spending.inputs.iter().enumerate() {
        if index == tracked_index {
            continue;
        }
        if lost_track.remove(&input.prevout.txid) {
            tracing::debug!(
                spending = %spending.txid,
                recovered_from = %input.prevout,
                amount = %input_values[index],
                "merging lost-track value into tracked bucket"
            );
            input_values[tracked_index] =
                input_values[tracked_index].saturating_add(input_values[index]);
            input_values[index] = Amount::ZERO;
        }
    }

    let assignment = assign_colors(&input_values, &spending.output_values());
    let relevant = assignment
        .iter()
        .enumerate()
        .filter(|(_, bucket)| **bucket == Some(tracked_index))
        .map(|(vout, _)| spending.outpoint(vout as u32))
        .collect();

    Ok(relevant)
}
