use coinpaint_reader::ReaderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("a transfer needs at least one input")]
    EmptyInputs,

    #[error("a transfer needs at least one output")]
    EmptyOutputs,

    #[error("node call failed: {0}")]
    Node(#[from] ReaderError),

    /// The node wallet could not produce all required signatures.
    #[error("signing incomplete: {0}")]
    SigningIncomplete(String),

    #[error("malformed node response: {0}")]
    Malformed(String),
}
