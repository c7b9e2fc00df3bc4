//! Holder: one element of an asset's current holder set.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amount::Amount;
use crate::outpoint::OutPoint;

/// A current holder of part of a tracked asset.
///
/// `outpoint` names the unspent output carrying the colored value. Holder
/// lists are only trustworthy when freshly produced by a trace; nothing
/// re-verifies unspentness on read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holder {
    pub address: Address,
    pub amount: Amount,
    pub outpoint: OutPoint,
}

impl Holder {
    pub fn new(address: Address, amount: Amount, outpoint: OutPoint) -> Self {
        Self {
            address,
            amount,
            outpoint,
        }
    }
}
