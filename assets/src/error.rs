use coinpaint_tracer::TraceError;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AssetError {
    /// Creating an asset under a name that already exists; nothing mutated.
    #[error("asset already exists: {0}")]
    DuplicateAsset(String),

    #[error("asset not found: {0}")]
    AssetNotFound(String),

    /// A dividend needs holders to pay; refresh the asset first.
    #[error("asset has no holders: {0}")]
    NoHolders(String),

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
