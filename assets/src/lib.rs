//! Asset ledger for coinpaint.
//!
//! Keeps the durable record of named assets — each a root output plus the
//! holder list last derived for it — and orchestrates refreshes through the
//! tracer. Persistence backends implement [`AssetStore`]; the rest of the
//! crate depends only on the trait.

pub mod error;
pub mod ledger;
pub mod memory;
pub mod store;
pub mod toml_store;

pub use error::AssetError;
pub use ledger::{AssetLedger, Holding};
pub use memory::InMemoryAssetStore;
pub use store::{AssetStore, StoreError};
pub use toml_store::TomlAssetStore;
