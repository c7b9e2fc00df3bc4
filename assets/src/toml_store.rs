//! TOML file asset store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use coinpaint_types::Asset;

use crate::store::{AssetStore, StoreError};

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    #[serde(default)]
    assets: BTreeMap<String, Asset>,
}

/// Asset records persisted as one TOML file.
///
/// Every write lands in a temp file in the same directory and is renamed
/// over the target, so a crash mid-write never corrupts the ledger.
pub struct TomlAssetStore {
    path: PathBuf,
}

impl TomlAssetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<LedgerFile, StoreError> {
        if !self.path.exists() {
            return Ok(LedgerFile::default());
        }
        let contents = fs::read_to_string(&self.path)?;
        toml::from_str(&contents).map_err(|e| StoreError::Serialize(e.to_string()))
    }

    fn save(&self, file: &LedgerFile) -> Result<(), StoreError> {
        let contents =
            toml::to_string_pretty(file).map_err(|e| StoreError::Serialize(e.to_string()))?;
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl AssetStore for TomlAssetStore {
    fn put_asset(&self, asset: &Asset) -> Result<(), StoreError> {
        let mut file = self.load()?;
        file.assets.insert(asset.name.clone(), asset.clone());
        self.save(&file)
    }

    fn get_asset(&self, name: &str) -> Result<Asset, StoreError> {
        self.load()?
            .assets
            .remove(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn list_assets(&self) -> Result<Vec<Asset>, StoreError> {
        Ok(self.load()?.assets.into_values().collect())
    }

    fn delete_asset(&self, name: &str) -> Result<(), StoreError> {
        let mut file = self.load()?;
        file.assets
            .remove(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        self.save(&file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinpaint_types::{Address, Amount, Holder, OutPoint, TxId};
    use std::str::FromStr;

    fn sample_asset() -> Asset {
        let root = OutPoint::from_str(&format!("{}:0", "ab".repeat(32))).unwrap();
        let mut asset = Asset::new("company-shares", root.clone());
        asset.holders.push(Holder::new(
            Address::new("alice"),
            Amount::from_sats(100),
            root,
        ));
        asset
    }

    #[test]
    fn test_put_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlAssetStore::new(dir.path().join("ledger.toml"));

        let asset = sample_asset();
        store.put_asset(&asset).unwrap();
        assert_eq!(store.get_asset("company-shares").unwrap(), asset);
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.toml");

        let asset = sample_asset();
        TomlAssetStore::new(&path).put_asset(&asset).unwrap();

        let reopened = TomlAssetStore::new(&path);
        assert_eq!(reopened.list_assets().unwrap(), vec![asset]);
    }

    #[test]
    fn test_missing_asset_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlAssetStore::new(dir.path().join("ledger.toml"));
        assert!(matches!(
            store.get_asset("ghost"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_removes_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlAssetStore::new(dir.path().join("ledger.toml"));

        store.put_asset(&sample_asset()).unwrap();
        store.delete_asset("company-shares").unwrap();
        assert!(store.list_assets().unwrap().is_empty());
        assert!(matches!(
            store.delete_asset("company-shares"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_txid_survives_toml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlAssetStore::new(dir.path().join("ledger.toml"));

        let asset = sample_asset();
        store.put_asset(&asset).unwrap();
        let loaded = store.get_asset("company-shares").unwrap();
        assert_eq!(loaded.root.txid, TxId::new("ab".repeat(32)).unwrap());
        assert_eq!(loaded.total(), Amount::from_sats(100));
    }
}
