//! coinpaint — track colored coins through a UTXO blockchain.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context};
use clap::Parser;
use serde::Deserialize;

use coinpaint_assets::{AssetLedger, TomlAssetStore};
use coinpaint_reader::{ExplorerReader, FallbackReader, NodeReader, NodeRpc};
use coinpaint_txbuild::{NodeBroadcaster, TxSpec};
use coinpaint_types::{Address, Amount, OutPoint};

#[derive(Parser)]
#[command(name = "coinpaint", about = "Track colored coins through a UTXO blockchain")]
struct Cli {
    /// bitcoind JSON-RPC URL (default: http://127.0.0.1:8332).
    #[arg(long, env = "COINPAINT_NODE_URL")]
    node_url: Option<String>,

    /// bitcoind RPC username.
    #[arg(long, env = "COINPAINT_NODE_USER")]
    node_user: Option<String>,

    /// bitcoind RPC password.
    #[arg(long, env = "COINPAINT_NODE_PASSWORD")]
    node_password: Option<String>,

    /// Esplora API base URL (default: https://blockstream.info/api).
    #[arg(long, env = "COINPAINT_EXPLORER_URL")]
    explorer_url: Option<String>,

    /// Path to the asset ledger file (default: coinpaint.toml).
    #[arg(long, env = "COINPAINT_LEDGER_FILE")]
    ledger_file: Option<PathBuf>,

    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Paint a coin: start tracking an asset anchored at a root output.
    Paint {
        name: String,
        /// Root output as txid:vout.
        root: OutPoint,
    },
    /// Re-derive an asset's holder list from the ledger.
    Refresh { name: String },
    /// Show the current holders of an asset.
    Holders { name: String },
    /// List tracked assets and their roots.
    List,
    /// Show aggregate holdings of the given addresses across all assets.
    Holdings { addresses: Vec<String> },
    /// Transfer a held asset output to one or more recipients.
    Transfer {
        /// Input as address:txid:vout (an entry from `holders`).
        #[arg(long)]
        from: String,
        /// Recipients as address:sats, repeatable.
        #[arg(long, required = true)]
        to: Vec<String>,
        /// Broadcast the signed transaction instead of printing it.
        #[arg(long)]
        send: bool,
    },
    /// Pay a dividend from the node wallet to an asset's current holders,
    /// split proportionally to the amount each holds.
    Pay {
        name: String,
        /// Total payment in sats; shares round down, the remainder stays
        /// in the wallet.
        total: u64,
        /// Broadcast the payment instead of just printing the split.
        #[arg(long)]
        send: bool,
    },
    /// Stop tracking an asset.
    Delete { name: String },
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    node_url: Option<String>,
    node_user: Option<String>,
    node_password: Option<String>,
    explorer_url: Option<String>,
    ledger_file: Option<PathBuf>,
}

struct Config {
    node_url: String,
    node_user: Option<String>,
    node_password: Option<String>,
    explorer_url: String,
    ledger_file: PathBuf,
}

impl Config {
    fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let file: FileConfig = match &cli.config {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                toml::from_str(&contents)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?
            }
            None => FileConfig::default(),
        };

        Ok(Self {
            node_url: cli
                .node_url
                .clone()
                .or(file.node_url)
                .unwrap_or_else(|| "http://127.0.0.1:8332".to_string()),
            node_user: cli.node_user.clone().or(file.node_user),
            node_password: cli.node_password.clone().or(file.node_password),
            explorer_url: cli
                .explorer_url
                .clone()
                .or(file.explorer_url)
                .unwrap_or_else(|| "https://blockstream.info/api".to_string()),
            ledger_file: cli
                .ledger_file
                .clone()
                .or(file.ledger_file)
                .unwrap_or_else(|| PathBuf::from("coinpaint.toml")),
        })
    }
}

/// Parse a `--from address:txid:vout` transfer input.
fn parse_transfer_input(raw: &str) -> anyhow::Result<(OutPoint, Address)> {
    let (address, outpoint) = raw
        .split_once(':')
        .context("expected address:txid:vout")?;
    let outpoint = OutPoint::from_str(outpoint).context("expected address:txid:vout")?;
    Ok((outpoint, Address::new(address)))
}

/// Parse a `--to address:sats` transfer output.
fn parse_transfer_output(raw: &str) -> anyhow::Result<(Address, Amount)> {
    let (address, sats) = raw.split_once(':').context("expected address:sats")?;
    let sats: u64 = sats.parse().context("amount must be an integer in sats")?;
    Ok((Address::new(address), Amount::from_sats(sats)))
}

fn print_holders(name: &str, holders: &[coinpaint_types::Holder]) {
    println!("*** {name} ***");
    let mut total = Amount::ZERO;
    for holder in holders {
        println!("{}  {}  {}", holder.address, holder.amount, holder.outpoint);
        total = total.saturating_add(holder.amount);
    }
    println!("** total: {total} **");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    coinpaint_utils::init_tracing();

    let cli = Cli::parse();
    let config = Config::resolve(&cli)?;
    tracing::debug!(
        node = %config.node_url,
        explorer = %config.explorer_url,
        ledger = %config.ledger_file.display(),
        "data sources configured"
    );

    let mut node_rpc = NodeRpc::new(&config.node_url)?;
    if let (Some(user), Some(password)) = (&config.node_user, &config.node_password) {
        node_rpc = node_rpc.with_auth(user, password);
    }

    let reader = FallbackReader::new(
        NodeReader::new(node_rpc.clone()),
        ExplorerReader::new(&config.explorer_url)?,
    );
    let store = TomlAssetStore::new(&config.ledger_file);
    let ledger = AssetLedger::new(reader, store);

    match cli.command {
        Command::Paint { name, root } => {
            ledger.create_asset(&name, root)?;
            let asset = ledger.refresh_asset(&name).await?;
            print_holders(&name, &asset.holders);
        }
        Command::Refresh { name } => {
            let asset = ledger.refresh_asset(&name).await?;
            print_holders(&name, &asset.holders);
        }
        Command::Holders { name } => {
            print_holders(&name, &ledger.holders(&name)?);
        }
        Command::List => {
            for asset in ledger.list_assets()? {
                println!("{}  {}", asset.name, asset.root);
            }
        }
        Command::Holdings { addresses } => {
            if addresses.is_empty() {
                bail!("give at least one address");
            }
            let addresses: Vec<Address> = addresses.into_iter().map(Address::new).collect();
            for holding in ledger.holdings(&addresses)? {
                println!("{}  {}", holding.asset, holding.amount);
            }
        }
        Command::Transfer { from, to, send } => {
            let input = parse_transfer_input(&from)?;
            let outputs = to
                .iter()
                .map(|raw| parse_transfer_output(raw))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let spec = TxSpec {
                inputs: vec![input],
                outputs,
            };

            let outcome = NodeBroadcaster::new(node_rpc).transfer(&spec, send).await?;
            match outcome.txid {
                Some(txid) => println!("broadcast: {txid}"),
                None => println!("{}", outcome.signed_hex),
            }
        }
        Command::Pay { name, total, send } => {
            let payouts = ledger.dividends(&name, Amount::from_sats(total))?;
            for (address, amount) in &payouts {
                println!("{address}  {amount}");
            }
            if send {
                let txid = NodeBroadcaster::new(node_rpc).send_many(&payouts).await?;
                println!("broadcast: {txid}");
            }
        }
        Command::Delete { name } => {
            ledger.delete_asset(&name)?;
            println!("deleted {name}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transfer_input() {
        let raw = format!("1PPgAlice:{}:1", "ef".repeat(32));
        let (outpoint, address) = parse_transfer_input(&raw).unwrap();
        assert_eq!(address, Address::new("1PPgAlice"));
        assert_eq!(outpoint.vout, 1);
        assert!(parse_transfer_input("missing-colon").is_err());
    }

    #[test]
    fn test_parse_transfer_output() {
        let (address, amount) = parse_transfer_output("1KRavBob:8000000").unwrap();
        assert_eq!(address, Address::new("1KRavBob"));
        assert_eq!(amount, Amount::from_sats(8_000_000));
        assert!(parse_transfer_output("1KRavBob:1.5").is_err());
    }
}
