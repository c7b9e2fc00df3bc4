use coinpaint_reader::ReaderError;
use coinpaint_types::OutPoint;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceError {
    /// Any reader failure aborts the whole trace; partial holder lists are
    /// never returned.
    #[error("ledger read failed: {0}")]
    Reader(#[from] ReaderError),

    /// An outpoint was visited twice. The spend relation on a well-formed
    /// ledger is a forest, so this indicates malformed or adversarial data.
    #[error("cycle detected at {0}")]
    CycleDetected(OutPoint),

    #[error("spend graph exceeds depth limit of {0}")]
    DepthExceeded(usize),

    /// The supposed spending transaction has no input referencing the
    /// tracked outpoint.
    #[error("spending transaction does not reference tracked output {0}")]
    TrackedInputMissing(OutPoint),

    /// An outpoint's index is out of range for its owning transaction.
    #[error("output index out of range: {0}")]
    BadOutputIndex(OutPoint),
}
