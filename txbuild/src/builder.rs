//! Typed surface over the node's raw-transaction RPCs.

use serde_json::{json, Map, Value};

use coinpaint_reader::NodeRpc;
use coinpaint_types::{Address, Amount, OutPoint, TxId};

use crate::error::BuildError;

/// What to spend and who to pay.
///
/// Inputs carry the owner address alongside the outpoint so callers can
/// assemble transfers straight from holder records; the node wallet resolves
/// the keys.
#[derive(Clone, Debug)]
pub struct TxSpec {
    pub inputs: Vec<(OutPoint, Address)>,
    pub outputs: Vec<(Address, Amount)>,
}

impl TxSpec {
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.inputs.is_empty() {
            return Err(BuildError::EmptyInputs);
        }
        if self.outputs.is_empty() {
            return Err(BuildError::EmptyOutputs);
        }
        Ok(())
    }

    /// Total value paid out.
    pub fn output_total(&self) -> Amount {
        self.outputs.iter().map(|(_, amount)| *amount).sum()
    }
}

/// Result of a transfer: the signed raw transaction, and the txid when it
/// was broadcast.
#[derive(Clone, Debug)]
pub struct TransferOutcome {
    pub signed_hex: String,
    pub txid: Option<TxId>,
}

/// Builds, signs, and optionally broadcasts transfers through a node.
pub struct NodeBroadcaster {
    rpc: NodeRpc,
}

impl NodeBroadcaster {
    pub fn new(rpc: NodeRpc) -> Self {
        Self { rpc }
    }

    /// Ask the node to assemble an unsigned raw transaction.
    pub async fn build(&self, spec: &TxSpec) -> Result<String, BuildError> {
        spec.validate()?;

        let inputs: Vec<Value> = spec
            .inputs
            .iter()
            .map(|(outpoint, _)| {
                json!({ "txid": outpoint.txid.as_str(), "vout": outpoint.vout })
            })
            .collect();

        let outputs = collapse_outputs(&spec.outputs);

        let result = self
            .rpc
            .call("createrawtransaction", json!([inputs, outputs]))
            .await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| BuildError::Malformed("createrawtransaction: expected hex string".into()))
    }

    /// Sign a raw transaction with the node wallet's keys.
    pub async fn sign(&self, raw_hex: &str) -> Result<String, BuildError> {
        let result = self
            .rpc
            .call("signrawtransactionwithwallet", json!([raw_hex]))
            .await?;

        let complete = result
            .get("complete")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !complete {
            let errors = result
                .get("errors")
                .map(|e| e.to_string())
                .unwrap_or_else(|| "missing keys".to_string());
            return Err(BuildError::SigningIncomplete(errors));
        }

        result
            .get("hex")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| BuildError::Malformed("signrawtransactionwithwallet: missing hex".into()))
    }

    /// Submit a signed transaction; returns the txid the node assigned.
    pub async fn broadcast(&self, signed_hex: &str) -> Result<TxId, BuildError> {
        let result = self
            .rpc
            .call("sendrawtransaction", json!([signed_hex]))
            .await?;
        let txid = result
            .as_str()
            .ok_or_else(|| BuildError::Malformed("sendrawtransaction: expected txid".into()))?;
        TxId::new(txid).map_err(|e| BuildError::Malformed(e.to_string()))
    }

    /// Pay several recipients from the node wallet in one transaction.
    ///
    /// Unlike [`transfer`](Self::transfer) this does not pin inputs; the
    /// wallet funds the payment itself (`sendmany`). Used for dividend runs
    /// against a holder list.
    pub async fn send_many(&self, payouts: &[(Address, Amount)]) -> Result<TxId, BuildError> {
        if payouts.is_empty() {
            return Err(BuildError::EmptyOutputs);
        }
        let outputs = collapse_outputs(payouts);

        let result = self.rpc.call("sendmany", json!(["", outputs])).await?;
        let txid = result
            .as_str()
            .ok_or_else(|| BuildError::Malformed("sendmany: expected txid".into()))?;
        let txid = TxId::new(txid).map_err(|e| BuildError::Malformed(e.to_string()))?;
        tracing::info!(%txid, recipients = payouts.len(), "dividend broadcast");
        Ok(txid)
    }

    /// Build and sign a transfer; broadcast it when `send` is set.
    pub async fn transfer(&self, spec: &TxSpec, send: bool) -> Result<TransferOutcome, BuildError> {
        let raw = self.build(spec).await?;
        let signed_hex = self.sign(&raw).await?;

        let txid = if send {
            let txid = self.broadcast(&signed_hex).await?;
            tracing::info!(%txid, total = %spec.output_total(), "transfer broadcast");
            Some(txid)
        } else {
            tracing::info!(total = %spec.output_total(), "transfer built but not broadcast");
            None
        };

        Ok(TransferOutcome { signed_hex, txid })
    }
}

// bitcoind keys outputs by address; repeated addresses collapse into one
// summed output.
fn collapse_outputs(outputs: &[(Address, Amount)]) -> Map<String, Value> {
    let mut collapsed = Map::new();
    for (address, amount) in outputs {
        let entry = collapsed
            .entry(address.as_str().to_string())
            .or_insert_with(|| Value::String(btc_string(Amount::ZERO)));
        let existing = entry
            .as_str()
            .and_then(parse_btc_string)
            .unwrap_or(Amount::ZERO);
        *entry = Value::String(btc_string(existing.saturating_add(*amount)));
    }
    collapsed
}

/// Render an amount as the decimal coin string bitcoind expects.
///
/// Strings instead of JSON floats keep satoshi precision end to end.
fn btc_string(amount: Amount) -> String {
    let sats = amount.sats();
    format!(
        "{}.{:08}",
        sats / coinpaint_types::amount::SATS_PER_COIN,
        sats % coinpaint_types::amount::SATS_PER_COIN
    )
}

fn parse_btc_string(s: &str) -> Option<Amount> {
    let (whole, frac) = s.split_once('.')?;
    let whole: u64 = whole.parse().ok()?;
    let frac: u64 = frac.parse().ok()?;
    Some(Amount::from_sats(
        whole * coinpaint_types::amount::SATS_PER_COIN + frac,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn outpoint() -> OutPoint {
        OutPoint::from_str(&format!("{}:1", "cd".repeat(32))).unwrap()
    }

    #[test]
    fn test_spec_validation() {
        let empty_inputs = TxSpec {
            inputs: vec![],
            outputs: vec![(Address::new("bob"), Amount::from_sats(1))],
        };
        assert!(matches!(
            empty_inputs.validate(),
            Err(BuildError::EmptyInputs)
        ));

        let empty_outputs = TxSpec {
            inputs: vec![(outpoint(), Address::new("alice"))],
            outputs: vec![],
        };
        assert!(matches!(
            empty_outputs.validate(),
            Err(BuildError::EmptyOutputs)
        ));
    }

    #[test]
    fn test_btc_string_formatting() {
        assert_eq!(btc_string(Amount::from_sats(0)), "0.00000000");
        assert_eq!(btc_string(Amount::from_sats(1)), "0.00000001");
        assert_eq!(btc_string(Amount::from_sats(150_000_000)), "1.50000000");
        assert_eq!(btc_string(Amount::from_sats(8_000_000)), "0.08000000");
    }

    #[test]
    fn test_btc_string_roundtrip() {
        for sats in [0u64, 1, 546, 8_000_000, 2_100_000_000_000_000] {
            let amount = Amount::from_sats(sats);
            assert_eq!(parse_btc_string(&btc_string(amount)), Some(amount));
        }
    }

    #[test]
    fn test_collapse_outputs_sums_repeated_addresses() {
        let outputs = collapse_outputs(&[
            (Address::new("1KRavBob"), Amount::from_sats(30)),
            (Address::new("1CamiCarol"), Amount::from_sats(70)),
            (Address::new("1KRavBob"), Amount::from_sats(20)),
        ]);
        assert_eq!(outputs["1KRavBob"], "0.00000050");
        assert_eq!(outputs["1CamiCarol"], "0.00000070");
    }

    #[tokio::test]
    async fn test_send_many_rejects_empty_payouts() {
        let broadcaster = NodeBroadcaster::new(NodeRpc::new("http://127.0.0.1:18443").unwrap());
        let err = broadcaster.send_many(&[]).await.unwrap_err();
        assert!(matches!(err, BuildError::EmptyOutputs));
    }

    #[test]
    fn test_output_total() {
        let spec = TxSpec {
            inputs: vec![(outpoint(), Address::new("alice"))],
            outputs: vec![
                (Address::new("bob"), Amount::from_sats(30)),
                (Address::new("carol"), Amount::from_sats(70)),
            ],
        };
        assert_eq!(spec.output_total(), Amount::from_sats(100));
    }
}
