//! Domain types for the transaction spend graph.
//!
//! Contains the [`GraphTx`] abstraction over transaction payloads, ancestry
//! ordering, and the serializable snapshot types (`SpendEdge`, `GraphStats`,
//! `GraphSnapshot`).

use std::collections::BTreeMap;

use bitcoin::{Amount, OutPoint, Script, Transaction, Txid};
use serde::Serialize;

// ==============================================================================
// Transaction Abstraction
// ==============================================================================

/// A transaction payload the graph can link and price.
///
/// The graph only needs an identifier, the outpoints spent by the inputs
/// (in input order), and the value and locking script of each output.
pub trait GraphTx {
    fn txid(&self) -> Txid;

    /// Outpoints spent by this transaction. Coinbase inputs are skipped since
    /// they reference no funding transaction.
    fn prevouts(&self) -> impl Iterator<Item = OutPoint> + '_;

    /// Outputs in index order as `(value, script_pubkey)`.
    fn outputs(&self) -> impl Iterator<Item = (Amount, &Script)> + '_;

    fn output(&self, vout: u32) -> Option<(Amount, &Script)> {
        self.outputs().nth(vout as usize)
    }
}

impl GraphTx for Transaction {
    fn txid(&self) -> Txid {
        self.compute_txid()
    }

    fn prevouts(&self) -> impl Iterator<Item = OutPoint> + '_ {
        self.input
            .iter()
            .map(|input| input.previous_output)
            .filter(|outpoint| !outpoint.is_null())
    }

    fn outputs(&self) -> impl Iterator<Item = (Amount, &Script)> + '_ {
        self.output
            .iter()
            .map(|output| (output.value, output.script_pubkey.as_script()))
    }

    fn output(&self, vout: u32) -> Option<(Amount, &Script)> {
        self.output
            .get(vout as usize)
            .map(|output| (output.value, output.script_pubkey.as_script()))
    }
}

// ==============================================================================
// Ancestry Ordering
// ==============================================================================

/// Result of comparing two nodes by spend ancestry.
///
/// This is a partial order: unrelated branches compare as `Unrelated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(i8)]
pub enum Ancestry {
    /// The first node depends on the second (the second is one of its
    /// ancestors, or the same node).
    Descendant = 1,
    /// The second node depends on the first.
    Ancestor = -1,
    Unrelated = 0,
}

impl Ancestry {
    pub fn as_i8(self) -> i8 {
        self as i8
    }

    pub fn reverse(self) -> Self {
        match self {
            Self::Descendant => Self::Ancestor,
            Self::Ancestor => Self::Descendant,
            Self::Unrelated => Self::Unrelated,
        }
    }
}

// ==============================================================================
// Graph Snapshot
// ==============================================================================

/// An edge in the spend DAG: "spending_txid spends funding_txid's output at
/// funding_vout."
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SpendEdge {
    pub funding_txid: Txid,
    pub funding_vout: u32,
    pub spending_txid: Txid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub frontier_count: usize,
    pub placeholder_count: usize,
}

/// Adjacency of a single node, as exposed in a [`GraphSnapshot`].
#[derive(Debug, Clone, Serialize)]
pub struct NodeSummary {
    pub txid: Txid,
    /// `true` when only referenced as a funding transaction so far.
    pub placeholder: bool,
    pub ancestors: Vec<Txid>,
    pub spenders: BTreeMap<u32, Txid>,
}

/// Serializable view of the whole graph.
#[derive(Debug, Clone, Serialize)]
pub struct GraphSnapshot {
    pub frontier: Vec<Txid>,
    pub nodes: Vec<NodeSummary>,
    pub edges: Vec<SpendEdge>,
    pub stats: GraphStats,
}
