mod cli;
mod load;

use clap::Parser;
use eyre::{eyre, WrapErr};
use serde::Serialize;
use serde_json::json;

use txgraph_core::types::NodeSummary;
use txgraph_core::TxGraph;

use crate::cli::{Cli, Command};

fn main() -> eyre::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let graph = load::load_graph(&args.tx_files).context("load transaction graph")?;
    let output = run(&graph, args.network, args.command)?;

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("serialize output")?
    );
    Ok(())
}

/// Execute a query against the loaded graph, producing its JSON output.
fn run(
    graph: &TxGraph,
    network: bitcoin::Network,
    command: Command,
) -> eyre::Result<serde_json::Value> {
    let value = match command {
        Command::Summary => to_json(graph.snapshot())?,
        Command::Frontier => to_json(summaries(graph.frontier()))?,
        Command::Tails => to_json(summaries(graph.tails()))?,
        Command::Find { txid } => {
            let node = graph
                .find_by_id(&txid)
                .ok_or_else(|| eyre!("transaction {txid} is not in the graph"))?;
            to_json(node.summary())?
        }
        Command::Compare { a, b } => {
            let ancestry = graph.compare(&a, &b);
            json!({ "ordering": ancestry.as_i8(), "relation": ancestry })
        }
        Command::Fee { txid } => {
            let tx = graph
                .find_by_id(&txid)
                .and_then(|node| node.tx())
                .ok_or_else(|| eyre!("transaction {txid} has no known payload"))?;
            let fee = graph.fee(tx).wrap_err_with(|| format!("compute fee of {txid}"))?;
            json!({ "txid": txid, "fee": fee.to_sat() })
        }
        Command::FeesAndValues { addresses } => {
            let results = graph
                .fees_and_values(addresses, Some(network))
                .context("compute fees and values")?;
            to_json(results)?
        }
    };
    Ok(value)
}

fn summaries<'a>(
    nodes: impl IntoIterator<Item = &'a txgraph_core::Node<bitcoin::Transaction>>,
) -> Vec<NodeSummary> {
    nodes.into_iter().map(|node| node.summary()).collect()
}

fn to_json(value: impl Serialize) -> eyre::Result<serde_json::Value> {
    serde_json::to_value(value).context("serialize output")
}
