//! Trusted bitcoind node client (primary data source).
//!
//! Wraps `reqwest::Client` with the node's base URL and credentials, and
//! exposes typed methods for the RPC calls coinpaint needs. bitcoind carries
//! no address index, so history lookups report `Unsupported` and the
//! fallback combinator routes them to the explorer.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use coinpaint_types::{Address, Amount, OutPoint, TxId, TxIn, TxOut, TxView};

use crate::error::ReaderError;
use crate::reader::LedgerReader;

/// bitcoind's "no such transaction" RPC error code.
const RPC_INVALID_ADDRESS_OR_KEY: i64 = -5;

/// Low-level JSON-RPC client for a bitcoind node.
///
/// Shared by [`NodeReader`] and the transaction builder, which both talk to
/// the same node.
#[derive(Clone)]
pub struct NodeRpc {
    http: reqwest::Client,
    url: String,
    auth: Option<(String, String)>,
}

impl NodeRpc {
    /// Create a client targeting the given base URL (e.g. `http://127.0.0.1:8332`).
    pub fn new(url: impl Into<String>) -> Result<Self, ReaderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ReaderError::Unavailable(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
            auth: None,
        })
    }

    /// Attach RPC credentials (basic auth).
    pub fn with_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some((user.into(), password.into()));
        self
    }

    /// The configured node URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue a JSON-RPC call and return the `result` field.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, ReaderError> {
        let body = json!({
            "jsonrpc": "1.0",
            "id": "coinpaint",
            "method": method,
            "params": params,
        });

        let mut request = self.http.post(&self.url).json(&body);
        if let Some((user, password)) = &self.auth {
            request = request.basic_auth(user, Some(password));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ReaderError::Unavailable(format!("request failed: {e}")))?;

        let status = response.status();
        let json: Value = response
            .json()
            .await
            .map_err(|e| ReaderError::Unavailable(format!("invalid JSON response: {e}")))?;

        if let Some(err) = json.get("error").filter(|e| !e.is_null()) {
            let code = err.get("code").and_then(Value::as_i64).unwrap_or(0);
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(ReaderError::Rpc { code, message });
        }

        if !status.is_success() {
            return Err(ReaderError::Unavailable(format!("node returned HTTP {status}")));
        }

        json.get("result")
            .cloned()
            .ok_or_else(|| ReaderError::Malformed("response missing result field".into()))
    }
}

/// Verbose `getrawtransaction` response, reduced to the fields we decode.
#[derive(Debug, Deserialize)]
struct RawTransaction {
    txid: String,
    vin: Vec<RawVin>,
    vout: Vec<RawVout>,
}

#[derive(Debug, Deserialize)]
struct RawVin {
    #[serde(default)]
    txid: Option<String>,
    #[serde(default)]
    vout: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawVout {
    value: f64,
    #[serde(rename = "scriptPubKey")]
    script_pub_key: RawScriptPubKey,
}

#[derive(Debug, Deserialize)]
struct RawScriptPubKey {
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    addresses: Vec<String>,
    #[serde(default)]
    hex: String,
}

impl RawScriptPubKey {
    /// Destination address; newer nodes report `address`, older ones a list.
    /// Outputs with no decodable address keep their script hex as an opaque
    /// key so unrelated outputs never fail a whole trace.
    fn destination(self) -> Address {
        match self.address {
            Some(a) => Address::new(a),
            None => match self.addresses.into_iter().next() {
                Some(a) => Address::new(a),
                None => Address::new(self.hex),
            },
        }
    }
}

/// Primary Ledger Reader backed by a bitcoind node.
#[derive(Clone)]
pub struct NodeReader {
    rpc: NodeRpc,
}

impl NodeReader {
    pub fn new(rpc: NodeRpc) -> Self {
        Self { rpc }
    }

    pub fn rpc(&self) -> &NodeRpc {
        &self.rpc
    }
}

impl LedgerReader for NodeReader {
    async fn transaction(&self, txid: &TxId) -> Result<TxView, ReaderError> {
        let result = match self
            .rpc
            .call("getrawtransaction", json!([txid.as_str(), true]))
            .await
        {
            Err(ReaderError::Rpc { code, .. }) if code == RPC_INVALID_ADDRESS_OR_KEY => {
                return Err(ReaderError::TxNotFound(txid.clone()));
            }
            other => other?,
        };

        let raw: RawTransaction = serde_json::from_value(result)
            .map_err(|e| ReaderError::Malformed(format!("getrawtransaction: {e}")))?;

        let mut inputs = Vec::with_capacity(raw.vin.len());
        for vin in raw.vin {
            // Coinbase inputs reference nothing; they cannot carry color.
            if let (Some(prev_txid), Some(prev_vout)) = (vin.txid, vin.vout) {
                inputs.push(TxIn {
                    prevout: OutPoint::new(TxId::new(prev_txid)?, prev_vout),
                });
            }
        }

        let mut outputs = Vec::with_capacity(raw.vout.len());
        for vout in raw.vout {
            outputs.push(TxOut {
                value: Amount::from_btc(vout.value)?,
                address: vout.script_pub_key.destination(),
            });
        }

        Ok(TxView {
            txid: TxId::new(raw.txid)?,
            inputs,
            outputs,
        })
    }

    async fn address_transactions(&self, _address: &Address) -> Result<Vec<TxId>, ReaderError> {
        Err(ReaderError::Unsupported("address history"))
    }
}
