//! Decoded transaction view.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amount::Amount;
use crate::outpoint::OutPoint;
use crate::txid::TxId;

/// One transaction input: the outpoint it spends.
///
/// Scripts and sequence numbers are irrelevant to provenance tracing and are
/// dropped at the Ledger Reader boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIn {
    pub prevout: OutPoint,
}

/// One transaction output: destination address and value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    pub address: Address,
    pub value: Amount,
}

/// Decoded view of a transaction, as the tracer consumes it.
///
/// Inputs and outputs keep ledger order. A `TxView` is never mutated after
/// the Ledger Reader produces it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxView {
    pub txid: TxId,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
}

impl TxView {
    /// Look up an output by index.
    pub fn output(&self, vout: u32) -> Option<&TxOut> {
        self.outputs.get(vout as usize)
    }

    /// The outpoint naming output `vout` of this transaction.
    pub fn outpoint(&self, vout: u32) -> OutPoint {
        OutPoint::new(self.txid.clone(), vout)
    }

    /// Whether any input spends `outpoint`.
    pub fn spends(&self, outpoint: &OutPoint) -> bool {
        self.inputs.iter().any(|i| &i.prevout == outpoint)
    }

    /// Output values in ledger order.
    pub fn output_values(&self) -> Vec<Amount> {
        self.outputs.iter().map(|o| o.value).collect()
    }
}
