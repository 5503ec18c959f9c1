use std::fs;
use std::path::Path;

use bitcoin::consensus::encode::deserialize_hex;
use bitcoin::Transaction;
use eyre::WrapErr;
use txgraph_core::TxGraph;

/// Decode every transaction in `contents`, one hex-encoded raw transaction
/// per line. Blank lines and `#` comments are skipped.
pub fn parse_transactions(contents: &str) -> eyre::Result<Vec<Transaction>> {
    contents
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            deserialize_hex::<Transaction>(line)
                .map_err(|e| eyre::eyre!("{e}"))
                .wrap_err_with(|| format!("decode transaction at line {line_no}"))
        })
        .collect()
}

/// Load the transactions of each file, in order, into a fresh graph.
pub fn load_graph(paths: &[impl AsRef<Path>]) -> eyre::Result<TxGraph> {
    let mut graph = TxGraph::new();

    for path in paths {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| format!("read transaction file `{}`", path.display()))?;
        let transactions = parse_transactions(&contents)
            .wrap_err_with(|| format!("parse transaction file `{}`", path.display()))?;

        let mut added = 0usize;
        for tx in transactions {
            if graph.add(tx) {
                added += 1;
            }
        }
        tracing::info!(path = %path.display(), added, "loaded transaction file");
    }

    tracing::info!(
        nodes = graph.len(),
        frontier = graph.frontier().count(),
        "built transaction graph"
    );
    Ok(graph)
}
