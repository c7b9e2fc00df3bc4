//! Asset persistence trait.

use coinpaint_types::Asset;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(String),
}

/// Durable storage for asset records.
///
/// Holder lists are stored inside the asset record, index-aligned with it;
/// `put_asset` always writes the whole record.
pub trait AssetStore {
    fn put_asset(&self, asset: &Asset) -> Result<(), StoreError>;

    fn get_asset(&self, name: &str) -> Result<Asset, StoreError>;

    /// All assets, ordered by name.
    fn list_assets(&self) -> Result<Vec<Asset>, StoreError>;

    fn delete_asset(&self, name: &str) -> Result<(), StoreError>;
}
