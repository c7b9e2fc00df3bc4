//! Order-based color assignment.

use coinpaint_types::Amount;

/// Assign each output of a transaction to an input bucket, in order.
///
/// Value from input `i` flows, in output order, into consecutive outputs
/// until its capacity is exhausted, then hands off to input `i + 1`. Returns
/// one entry per output: `Some(bucket_index)` or `None` when the buckets ran
/// out before the output could be placed (the output and everything after it
/// stay unassigned).
///
/// A zero-value input defines an empty bucket that is skipped immediately; a
/// zero-value output is assigned to whichever bucket is current without
/// consuming capacity. Deterministic, no backtracking, O(inputs + outputs).
pub fn assign_colors(input_values: &[Amount], output_values: &[Amount]) -> Vec<Option<usize>> {
    let mut assignment = vec![None; output_values.len()];
    let mut bucket: Option<usize> = None;
    let mut spent = Amount::ZERO;
    let mut capacity = Amount::ZERO;

    for (index, value) in output_values.iter().enumerate() {
        loop {
            if bucket.is_some() && spent.saturating_add(*value) <= capacity {
                break;
            }
            let next = bucket.map_or(0, |b| b + 1);
            match input_values.get(next) {
                Some(cap) => {
                    bucket = Some(next);
                    spent = Amount::ZERO;
                    capacity = *cap;
                }
                // Buckets exhausted: this output and all that follow stay
                // unassigned.
                None => return assignment,
            }
        }
        assignment[index] = bucket;
        spent = spent + *value;
    }

    assignment
}
