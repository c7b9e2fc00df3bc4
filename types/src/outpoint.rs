//! Outpoint: a stable reference to one transaction output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypeError;
use crate::txid::TxId;

/// A reference to output `vout` of transaction `txid`.
///
/// Equality is structural; an outpoint never changes once created. Displayed
/// and parsed as `txid:vout`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutPoint {
    pub txid: TxId,
    pub vout: u32,
}

impl OutPoint {
    pub fn new(txid: TxId, vout: u32) -> Self {
        Self { txid, vout }
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

impl fmt::Debug for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutPoint({}:{})", &self.txid.as_str()[..8], self.vout)
    }
}

impl FromStr for OutPoint {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (txid, vout) = s
            .split_once(':')
            .ok_or_else(|| TypeError::InvalidOutPoint(s.to_string()))?;
        let txid = TxId::new(txid)?;
        let vout = vout
            .parse::<u32>()
            .map_err(|_| TypeError::InvalidOutPoint(s.to_string()))?;
        Ok(Self { txid, vout })
    }
}
