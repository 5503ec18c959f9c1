use std::path::PathBuf;

use bitcoin::{Network, Txid};
use clap::{Parser, Subcommand};

/// txgraph: build a spend graph from raw Bitcoin transactions and query
/// its frontier, tails, ancestry, fees, and address values.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Files with one hex-encoded raw transaction per line (repeatable).
    /// Blank lines and lines starting with `#` are skipped.
    #[arg(long = "tx-file", required = true, env = "TXGRAPH_TX_FILE", value_delimiter = ',')]
    pub tx_files: Vec<PathBuf>,

    /// Network used to decode output addresses (bitcoin, testnet, signet,
    /// regtest; Bitcoin Core's `main` and `test` are accepted too).
    #[arg(long, default_value = "bitcoin", env = "TXGRAPH_NETWORK", value_parser = parse_network)]
    pub network: Network,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print graph statistics, nodes, and spend edges.
    Summary,
    /// Print the transactions not known to be spent by anything in the graph.
    Frontier,
    /// Print the transactions with no known funding transaction.
    Tails,
    /// Look up a single node by txid.
    Find { txid: Txid },
    /// Order two transactions by spend ancestry (1, -1, or 0 when unrelated).
    Compare { a: Txid, b: Txid },
    /// Print the fee paid by a transaction in the graph.
    Fee { txid: Txid },
    /// Print the fee and tracked-address value of every funded transaction.
    FeesAndValues {
        /// Tracked address (repeatable).
        #[arg(long = "address", required = true)]
        addresses: Vec<String>,
    },
}

/// Map a chain name to a network, accepting both Bitcoin Core's chain names
/// (`main`, `test`) and the `bitcoin` crate's (`bitcoin`, `testnet`).
pub fn parse_network(name: &str) -> Result<Network, String> {
    match name {
        "main" | "bitcoin" | "mainnet" => Ok(Network::Bitcoin),
        "test" | "testnet" => Ok(Network::Testnet),
        "signet" => Ok(Network::Signet),
        "regtest" => Ok(Network::Regtest),
        _ => Err(format!("unrecognized network `{name}`")),
    }
}
