//! In-memory asset store.

use std::collections::BTreeMap;
use std::sync::Mutex;

use coinpaint_types::Asset;

use crate::store::{AssetStore, StoreError};

/// Volatile store backed by a map. The default for tests and for callers
/// that manage persistence themselves.
#[derive(Default)]
pub struct InMemoryAssetStore {
    assets: Mutex<BTreeMap<String, Asset>>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssetStore for InMemoryAssetStore {
    fn put_asset(&self, asset: &Asset) -> Result<(), StoreError> {
        let mut assets = self
            .assets
            .lock()
            .map_err(|_| StoreError::Serialize("store lock poisoned".into()))?;
        assets.insert(asset.name.clone(), asset.clone());
        Ok(())
    }

    fn get_asset(&self, name: &str) -> Result<Asset, StoreError> {
        let assets = self
            .assets
            .lock()
            .map_err(|_| StoreError::Serialize("store lock poisoned".into()))?;
        assets
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn list_assets(&self) -> Result<Vec<Asset>, StoreError> {
        let assets = self
            .assets
            .lock()
            .map_err(|_| StoreError::Serialize("store lock poisoned".into()))?;
        Ok(assets.values().cloned().collect())
    }

    fn delete_asset(&self, name: &str) -> Result<(), StoreError> {
        let mut assets = self
            .assets
            .lock()
            .map_err(|_| StoreError::Serialize("store lock poisoned".into()))?;
        assets
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}
