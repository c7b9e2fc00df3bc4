//! The asset ledger: create, refresh, and query tracked assets.

use std::collections::BTreeMap;

use coinpaint_reader::LedgerReader;
use coinpaint_tracer::Tracer;
use coinpaint_types::{Address, Amount, Asset, Holder, OutPoint};

use crate::error::AssetError;
use crate::store::{AssetStore, StoreError};

/// Aggregate amount of one asset held across a set of addresses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Holding {
    pub asset: String,
    pub amount: Amount,
}

/// Owns the asset records and drives the tracer.
///
/// Refreshes for the same asset must not run concurrently; the ledger takes
/// `&self` for reads but callers serialize refreshes per asset name.
pub struct AssetLedger<R, S> {
    tracer: Tracer<R>,
    store: S,
}

impl<R: LedgerReader + Sync, S: AssetStore> AssetLedger<R, S> {
    pub fn new(reader: R, store: S) -> Self {
        Self {
            tracer: Tracer::new(reader),
            store,
        }
    }

    pub fn reader(&self) -> &R {
        self.tracer.reader()
    }

    fn load(&self, name: &str) -> Result<Asset, AssetError> {
        match self.store.get_asset(name) {
            Ok(asset) => Ok(asset),
            Err(StoreError::NotFound(_)) => Err(AssetError::AssetNotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Start tracking a colored coin anchored at `root`.
    ///
    /// The record starts with an empty holder list; run
    /// [`refresh_asset`](Self::refresh_asset) to populate it.
    pub fn create_asset(&self, name: &str, root: OutPoint) -> Result<Asset, AssetError> {
        match self.store.get_asset(name) {
            Ok(_) => return Err(AssetError::DuplicateAsset(name.to_string())),
            Err(StoreError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }
        let asset = Asset::new(name, root);
        self.store.put_asset(&asset)?;
        tracing::info!(asset = name, root = %asset.root, "tracking new asset");
        Ok(asset)
    }

    /// Re-derive the asset's holder list from the ledger and persist it.
    ///
    /// A full re-derivation, not an incremental update: safe to re-run after
    /// any earlier failure, and idempotent while the chain has no new
    /// spends. On any trace failure the stored holder list stays untouched.
    pub async fn refresh_asset(&self, name: &str) -> Result<Asset, AssetError> {
        let mut asset = self.load(name)?;
        let report = self.tracer.trace(&asset.root).await?;

        if !report.is_complete() {
            tracing::warn!(
                asset = name,
                unrecovered = report.lost_track.len(),
                "holder list is best-effort: some branches stayed lost"
            );
        }

        asset.holders = report.holders;
        self.store.put_asset(&asset)?;
        tracing::info!(
            asset = name,
            holders = asset.holders.len(),
            total = %asset.total(),
            "asset refreshed"
        );
        Ok(asset)
    }

    /// All tracked assets, ordered by name.
    pub fn list_assets(&self) -> Result<Vec<Asset>, AssetError> {
        Ok(self.store.list_assets()?)
    }

    /// The holder list last derived for `name`.
    pub fn holders(&self, name: &str) -> Result<Vec<Holder>, AssetError> {
        Ok(self.load(name)?.holders)
    }

    /// Aggregate holdings of the given addresses across all assets.
    ///
    /// Assets where the addresses hold nothing are omitted.
    pub fn holdings(&self, addresses: &[Address]) -> Result<Vec<Holding>, AssetError> {
        let mut holdings = Vec::new();
        for asset in self.store.list_assets()? {
            let amount: Amount = asset
                .holders
                .iter()
                .filter(|h| addresses.contains(&h.address))
                .map(|h| h.amount)
                .sum();
            if !amount.is_zero() {
                holdings.push(Holding {
                    asset: asset.name,
                    amount,
                });
            }
        }
        Ok(holdings)
    }

    /// Split a payment across the asset's current holders, proportional to
    /// the amount each holds.
    ///
    /// Integer math rounds every share down, so the payouts never sum above
    /// `total`; remainder sats stay with the payer. Holders sharing an
    /// address receive one combined payout, ordered by address; zero shares
    /// are omitted. Fails when the asset has no holders to pay.
    pub fn dividends(
        &self,
        name: &str,
        total: Amount,
    ) -> Result<Vec<(Address, Amount)>, AssetError> {
        let asset = self.load(name)?;
        let pool = asset.total().sats();
        if pool == 0 {
            return Err(AssetError::NoHolders(name.to_string()));
        }

        let mut held: BTreeMap<Address, u128> = BTreeMap::new();
        for holder in &asset.holders {
            *held.entry(holder.address.clone()).or_default() += holder.amount.sats() as u128;
        }

        let mut payouts = Vec::new();
        for (address, amount) in held {
            let share = (total.sats() as u128 * amount / pool as u128) as u64;
            if share > 0 {
                payouts.push((address, Amount::from_sats(share)));
            }
        }
        Ok(payouts)
    }

    /// Remove an asset record entirely.
    pub fn delete_asset(&self, name: &str) -> Result<(), AssetError> {
        match self.store.delete_asset(name) {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound(_)) => Err(AssetError::AssetNotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryAssetStore;
    use coinpaint_nullables::NullReader;
    use coinpaint_types::{TxId, TxIn, TxOut, TxView};

    fn txid(pair: &str) -> TxId {
        TxId::new(pair.repeat(32)).unwrap()
    }

    fn tx(id: &str, spends: &[(&str, u32)], pays: &[(&str, u64)]) -> TxView {
        TxView {
            txid: txid(id),
            inputs: spends
                .iter()
                .map(|(prev, vout)| TxIn {
                    prevout: OutPoint::new(txid(prev), *vout),
                })
                .collect(),
            outputs: pays
                .iter()
                .map(|(addr, value)| TxOut {
                    address: Address::new(*addr),
                    value: Amount::from_sats(*value),
                })
                .collect(),
        }
    }

    fn ledger_with_split_chain() -> AssetLedger<NullReader, InMemoryAssetStore> {
        let reader = NullReader::new();
        reader.add_transaction(tx("aa", &[], &[("alice", 100)]));
        reader.add_transaction(tx("bb", &[("aa", 0)], &[("bob", 30), ("carol", 70)]));
        AssetLedger::new(reader, InMemoryAssetStore::new())
    }

    fn root() -> OutPoint {
        OutPoint::new(txid("aa"), 0)
    }

    struct BrokenStore;

    impl AssetStore for BrokenStore {
        fn put_asset(&self, _asset: &Asset) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }

        fn get_asset(&self, _name: &str) -> Result<Asset, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }

        fn list_assets(&self) -> Result<Vec<Asset>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }

        fn delete_asset(&self, _name: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }
    }

    #[test]
    fn test_create_asset_rejects_duplicates() {
        let ledger = ledger_with_split_chain();
        ledger.create_asset("shares", root()).unwrap();

        let err = ledger.create_asset("shares", root()).unwrap_err();
        assert!(matches!(err, AssetError::DuplicateAsset(_)));
        assert_eq!(ledger.list_assets().unwrap().len(), 1);
    }

    #[test]
    fn test_create_asset_propagates_store_failures() {
        let ledger = AssetLedger::new(NullReader::new(), BrokenStore);

        let err = ledger.create_asset("shares", root()).unwrap_err();
        assert!(matches!(err, AssetError::Store(StoreError::Io(_))));
    }

    #[tokio::test]
    async fn test_refresh_replaces_holder_list() {
        let ledger = ledger_with_split_chain();
        ledger.create_asset("shares", root()).unwrap();
        assert!(ledger.holders("shares").unwrap().is_empty());

        let asset = ledger.refresh_asset("shares").await.unwrap();
        assert_eq!(asset.holders.len(), 2);
        assert_eq!(asset.total(), Amount::from_sats(100));
        assert_eq!(ledger.holders("shares").unwrap(), asset.holders);
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent_without_new_spends() {
        let ledger = ledger_with_split_chain();
        ledger.create_asset("shares", root()).unwrap();

        let first = ledger.refresh_asset("shares").await.unwrap();
        let second = ledger.refresh_asset("shares").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_holders() {
        let ledger = ledger_with_split_chain();
        ledger.create_asset("shares", root()).unwrap();
        let before = ledger.refresh_asset("shares").await.unwrap();

        ledger.reader().set_unavailable(true);
        assert!(ledger.refresh_asset("shares").await.is_err());
        assert_eq!(ledger.holders("shares").unwrap(), before.holders);
    }

    #[tokio::test]
    async fn test_refresh_missing_asset_fails() {
        let ledger = ledger_with_split_chain();
        let err = ledger.refresh_asset("ghost").await.unwrap_err();
        assert!(matches!(err, AssetError::AssetNotFound(_)));
    }

    #[tokio::test]
    async fn test_holdings_aggregate_per_asset() {
        let ledger = ledger_with_split_chain();
        ledger.create_asset("shares", root()).unwrap();
        ledger.refresh_asset("shares").await.unwrap();

        let holdings = ledger
            .holdings(&[Address::new("bob"), Address::new("carol")])
            .unwrap();
        assert_eq!(
            holdings,
            vec![Holding {
                asset: "shares".to_string(),
                amount: Amount::from_sats(100),
            }]
        );

        let none = ledger.holdings(&[Address::new("mallory")]).unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_dividends_split_pro_rata() {
        let ledger = ledger_with_split_chain();
        ledger.create_asset("shares", root()).unwrap();
        ledger.refresh_asset("shares").await.unwrap();

        let payouts = ledger
            .dividends("shares", Amount::from_sats(1_000))
            .unwrap();
        assert_eq!(
            payouts,
            vec![
                (Address::new("bob"), Amount::from_sats(300)),
                (Address::new("carol"), Amount::from_sats(700)),
            ]
        );
    }

    #[tokio::test]
    async fn test_dividends_round_down_and_never_overpay() {
        let ledger = ledger_with_split_chain();
        ledger.create_asset("shares", root()).unwrap();
        ledger.refresh_asset("shares").await.unwrap();

        // 33 * 30/100 = 9.9 and 33 * 70/100 = 23.1; one sat stays unpaid.
        let payouts = ledger.dividends("shares", Amount::from_sats(33)).unwrap();
        assert_eq!(
            payouts,
            vec![
                (Address::new("bob"), Amount::from_sats(9)),
                (Address::new("carol"), Amount::from_sats(23)),
            ]
        );

        let paid: Amount = payouts.iter().map(|(_, amount)| *amount).sum();
        assert!(paid <= Amount::from_sats(33));
    }

    #[tokio::test]
    async fn test_dividends_omit_zero_shares() {
        let ledger = ledger_with_split_chain();
        ledger.create_asset("shares", root()).unwrap();
        ledger.refresh_asset("shares").await.unwrap();

        let payouts = ledger.dividends("shares", Amount::from_sats(1)).unwrap();
        assert!(payouts.is_empty());
    }

    #[test]
    fn test_dividends_need_holders() {
        let ledger = ledger_with_split_chain();
        ledger.create_asset("shares", root()).unwrap();

        let err = ledger
            .dividends("shares", Amount::from_sats(1_000))
            .unwrap_err();
        assert!(matches!(err, AssetError::NoHolders(_)));
    }
}
