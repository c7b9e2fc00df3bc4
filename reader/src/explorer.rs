//! Public block explorer client (secondary data source).
//!
//! Speaks the Esplora REST API (`/tx/{txid}`, `/address/{addr}/txs`), which
//! reports values as integer satoshis and includes prevout references
//! directly, so no float conversion is needed on this path.

use std::time::Duration;

use serde::Deserialize;

use coinpaint_types::{Address, Amount, OutPoint, TxId, TxIn, TxOut, TxView};

use crate::error::ReaderError;
use crate::reader::LedgerReader;

/// Esplora pages confirmed address history 25 transactions at a time; the
/// first page additionally carries every mempool transaction, so only the
/// confirmed entries count toward the page size.
const HISTORY_PAGE_SIZE: usize = 25;

#[derive(Debug, Deserialize)]
struct EsploraTx {
    txid: String,
    vin: Vec<EsploraVin>,
    vout: Vec<EsploraVout>,
    #[serde(default)]
    status: EsploraStatus,
}

#[derive(Debug, Default, Deserialize)]
struct EsploraStatus {
    #[serde(default)]
    confirmed: bool,
}

#[derive(Debug, Deserialize)]
struct EsploraVin {
    #[serde(default)]
    txid: Option<String>,
    #[serde(default)]
    vout: Option<u32>,
    #[serde(default)]
    is_coinbase: bool,
}

#[derive(Debug, Deserialize)]
struct EsploraVout {
    value: u64,
    #[serde(default)]
    scriptpubkey_address: Option<String>,
    #[serde(default)]
    scriptpubkey: String,
}

/// Secondary Ledger Reader backed by an Esplora-style explorer.
#[derive(Clone)]
pub struct ExplorerReader {
    http: reqwest::Client,
    base_url: String,
}

impl ExplorerReader {
    /// Create a client for the given API base (e.g. `https://blockstream.info/api`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ReaderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ReaderError::Unavailable(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, ReaderError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ReaderError::Unavailable(format!("request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ReaderError::Unavailable(format!(
                "explorer returned HTTP {} for {path}",
                response.status()
            )));
        }

        let value = response
            .json::<T>()
            .await
            .map_err(|e| ReaderError::Malformed(format!("{path}: {e}")))?;
        Ok(Some(value))
    }

    fn convert(&self, raw: EsploraTx) -> Result<TxView, ReaderError> {
        let mut inputs = Vec::with_capacity(raw.vin.len());
        for vin in raw.vin {
            if vin.is_coinbase {
                continue;
            }
            if let (Some(prev_txid), Some(prev_vout)) = (vin.txid, vin.vout) {
                inputs.push(TxIn {
                    prevout: OutPoint::new(TxId::new(prev_txid)?, prev_vout),
                });
            }
        }

        let outputs = raw
            .vout
            .into_iter()
            .map(|v| TxOut {
                value: Amount::from_sats(v.value),
                address: match v.scriptpubkey_address {
                    Some(a) => Address::new(a),
                    None => Address::new(v.scriptpubkey),
                },
            })
            .collect();

        Ok(TxView {
            txid: TxId::new(raw.txid)?,
            inputs,
            outputs,
        })
    }
}

impl LedgerReader for ExplorerReader {
    async fn transaction(&self, txid: &TxId) -> Result<TxView, ReaderError> {
        let raw: EsploraTx = self
            .get_json(&format!("/tx/{txid}"))
            .await?
            .ok_or_else(|| ReaderError::TxNotFound(txid.clone()))?;
        self.convert(raw)
    }

    async fn address_transactions(&self, address: &Address) -> Result<Vec<TxId>, ReaderError> {
        let mut history: Vec<TxId> = Vec::new();
        let mut page: Vec<EsploraTx> = self
            .get_json(&format!("/address/{address}/txs"))
            .await?
            .unwrap_or_default();

        loop {
            let cursor = next_page_cursor(&page).map(str::to_string);
            for tx in page {
                history.push(TxId::new(tx.txid)?);
            }
            let last = match cursor {
                Some(last) => last,
                None => break,
            };
            page = self
                .get_json(&format!("/address/{address}/txs/chain/{last}"))
                .await?
                .unwrap_or_default();
        }

        Ok(history)
    }
}

/// Where to resume confirmed-history pagination, if anywhere.
///
/// Fewer than a full page of confirmed transactions means the confirmed
/// history is complete. The `/chain/{last}` cursor must be a confirmed txid;
/// a mempool txid there makes the explorer reject the request.
fn next_page_cursor(page: &[EsploraTx]) -> Option<&str> {
    let mut confirmed = 0usize;
    let mut last_confirmed = None;
    for tx in page {
        if tx.status.confirmed {
            confirmed += 1;
            last_confirmed = Some(tx.txid.as_str());
        }
    }
    if confirmed < HISTORY_PAGE_SIZE {
        return None;
    }
    last_confirmed
}
