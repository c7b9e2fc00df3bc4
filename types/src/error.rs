use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypeError {
    #[error("invalid transaction id: {0}")]
    InvalidTxId(String),

    #[error("invalid outpoint: {0}")]
    InvalidOutPoint(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}
