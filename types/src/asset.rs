//! Asset: a named colored coin anchored at a root output.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::holder::Holder;
use crate::outpoint::OutPoint;

/// A tracked asset.
///
/// `root` is fixed at creation. `holders` is replaced wholesale on each
/// refresh; it is never patched incrementally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub root: OutPoint,
    #[serde(default)]
    pub holders: Vec<Holder>,
}

impl Asset {
    pub fn new(name: impl Into<String>, root: OutPoint) -> Self {
        Self {
            name: name.into(),
            root,
            holders: Vec::new(),
        }
    }

    /// Sum of all holder amounts.
    pub fn total(&self) -> Amount {
        self.holders.iter().map(|h| h.amount).sum()
    }
}
