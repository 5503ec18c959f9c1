use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use bitcoin::{Network, SignedAmount, Transaction, Txid};

use crate::error::{GraphError, PreconditionError};
use crate::fees::{self, AddressSet, FeeAndValue};
use crate::node::Node;
use crate::types::{Ancestry, GraphSnapshot, GraphStats, GraphTx, NodeSummary, SpendEdge};

/// Network used for address decoding when the caller does not pick one.
pub const DEFAULT_NETWORK: Network = Network::Bitcoin;

// ==============================================================================
// Spend Graph
// ==============================================================================

/// A directed acyclic graph of transactions linked by spends.
///
/// Transactions can be added in any order. A transaction referenced as an
/// input before it is itself added is represented by a placeholder node,
/// which gets its payload once the transaction arrives.
///
/// The graph owns every node in an arena keyed by txid. The frontier holds
/// the nodes not known to be spent by anything in the graph, and all
/// traversals start from it.
#[derive(Debug, Clone)]
pub struct TxGraph<T = Transaction> {
    nodes: HashMap<Txid, Node<T>>,
    frontier: BTreeSet<Txid>,
}

impl<T> Default for TxGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ==============================================================================
// Lookup and Traversal
// ==============================================================================

impl<T> TxGraph<T> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            frontier: BTreeSet::new(),
        }
    }

    /// Number of nodes, placeholders included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct arena access, without the frontier search of [`Self::find_by_id`].
    pub fn get(&self, id: &Txid) -> Option<&Node<T>> {
        self.nodes.get(id)
    }

    /// Nodes not known to be spent by anything in the graph, by txid order.
    pub fn frontier(&self) -> impl Iterator<Item = &Node<T>> + '_ {
        self.frontier.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Every node reachable from the frontier through ancestors or spenders,
    /// placeholders included. The order is unspecified.
    pub fn all_nodes(&self) -> Vec<&Node<T>> {
        let mut visited: HashSet<Txid> = HashSet::new();
        let mut queue: VecDeque<Txid> = self.frontier.iter().copied().collect();
        let mut found = Vec::new();

        while let Some(id) = queue.pop_front() {
            if !visited.insert(id) {
                continue;
            }
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            queue.extend(node.ancestors().iter().copied());
            queue.extend(node.spenders().values().copied());
            found.push(node);
        }

        tracing::trace!(count = found.len(), "collected all nodes");
        found
    }

    /// Find a node by searching outward from the frontier, breadth-first,
    /// through ancestors only.
    pub fn find_by_id(&self, id: &Txid) -> Option<&Node<T>> {
        let mut visited: HashSet<Txid> = HashSet::new();
        let mut queue: VecDeque<Txid> = self.frontier.iter().copied().collect();

        while let Some(candidate) = queue.pop_front() {
            if !visited.insert(candidate) {
                continue;
            }
            let Some(node) = self.nodes.get(&candidate) else {
                continue;
            };
            if node.id() == *id {
                return Some(node);
            }
            queue.extend(node.ancestors().iter().copied());
        }

        None
    }

    /// Order two nodes by spend ancestry.
    ///
    /// `Descendant` when `b` is reachable from `a` through ancestors (a node
    /// reaches itself), `Ancestor` when `a` is reachable from `b`, and
    /// `Unrelated` otherwise or when either id is unknown.
    pub fn compare(&self, a: &Txid, b: &Txid) -> Ancestry {
        if self.reaches(a, b) {
            Ancestry::Descendant
        } else if self.reaches(b, a) {
            Ancestry::Ancestor
        } else {
            Ancestry::Unrelated
        }
    }

    /// Depth-first search from `start` through ancestors for `target`.
    fn reaches(&self, start: &Txid, target: &Txid) -> bool {
        let mut visited: HashSet<Txid> = HashSet::new();
        let mut stack: Vec<Txid> = vec![*start];

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if id == *target {
                return true;
            }
            stack.extend(node.ancestors().iter().rev().copied());
        }

        false
    }

    /// Nodes with no known ancestors, reachable from the frontier.
    ///
    /// These are the historical boundary of the graph: transactions (or
    /// placeholders) whose funding transactions are unknown.
    pub fn tails(&self) -> Vec<&Node<T>> {
        let mut visited: HashSet<Txid> = HashSet::new();
        let mut stack: Vec<Txid> = self.frontier.iter().rev().copied().collect();
        let mut tails = Vec::new();

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if node.ancestors().is_empty() {
                tails.push(node);
            } else {
                stack.extend(node.ancestors().iter().rev().copied());
            }
        }

        tails
    }

    /// All spend edges, sorted by funding outpoint.
    pub fn edges(&self) -> Vec<SpendEdge> {
        let mut edges: Vec<SpendEdge> = self
            .nodes
            .values()
            .flat_map(|node| {
                node.spenders().iter().map(|(&vout, &spender)| SpendEdge {
                    funding_txid: node.id(),
                    funding_vout: vout,
                    spending_txid: spender,
                })
            })
            .collect();
        edges.sort();
        edges
    }

    /// Serializable view of the whole graph, nodes sorted by txid.
    pub fn snapshot(&self) -> GraphSnapshot {
        let mut nodes: Vec<NodeSummary> = self.nodes.values().map(Node::summary).collect();
        nodes.sort_by_key(|node| node.txid);

        let edges = self.edges();
        let stats = GraphStats {
            node_count: nodes.len(),
            edge_count: edges.len(),
            frontier_count: self.frontier.len(),
            placeholder_count: nodes.iter().filter(|node| node.placeholder).count(),
        };

        GraphSnapshot {
            frontier: self.frontier.iter().copied().collect(),
            nodes,
            edges,
            stats,
        }
    }
}

// ==============================================================================
// Ingestion and Fees
// ==============================================================================

impl<T: GraphTx> TxGraph<T> {
    /// Add a transaction, linking it to the transactions it spends.
    ///
    /// Returns `true` if the graph had no node for this txid yet. Adding a
    /// transaction that is already present (including as a placeholder)
    /// returns `false` and replaces its payload.
    pub fn add(&mut self, tx: T) -> bool {
        let id = tx.txid();
        let prevouts: Vec<_> = tx.prevouts().collect();

        let is_new = self.find_by_id(&id).is_none();
        let node = self.nodes.entry(id).or_insert_with(|| Node::new(id));
        if is_new {
            tracing::debug!(txid = %id, inputs = prevouts.len(), "adding new transaction");
        } else if node.is_placeholder() {
            tracing::debug!(txid = %id, "completing placeholder node");
        }

        if node.spenders().is_empty() && self.frontier.insert(id) {
            tracing::trace!(txid = %id, "node joined the frontier");
        }
        node.set_tx(tx);

        for prevout in prevouts {
            let ancestor_id = prevout.txid;
            if !self.nodes.contains_key(&ancestor_id) {
                tracing::debug!(txid = %ancestor_id, spender = %id, "creating placeholder node");
            }

            let ancestor = self
                .nodes
                .entry(ancestor_id)
                .or_insert_with(|| Node::new(ancestor_id));
            if self.frontier.remove(&ancestor_id) {
                tracing::trace!(txid = %ancestor_id, "node left the frontier");
            }
            ancestor.set_spender(prevout.vout, id);

            if let Some(node) = self.nodes.get_mut(&id) {
                node.push_ancestor(ancestor_id);
            }
        }

        is_new
    }

    /// Fee paid by `tx`, which need not be part of the graph itself.
    ///
    /// Every transaction `tx` spends from must be in the graph with its
    /// payload, otherwise [`GraphError::InputNotFound`] is returned.
    pub fn fee(&self, tx: &T) -> Result<SignedAmount, GraphError> {
        let ancestors = tx
            .prevouts()
            .map(|prevout| {
                self.find_by_id(&prevout.txid)
                    .filter(|node| !node.is_placeholder())
                    .ok_or(GraphError::InputNotFound(prevout.txid))
            })
            .collect::<Result<Vec<_>, _>>()?;

        match fees::fee_and_value(tx, &ancestors, &AddressSet::new(), DEFAULT_NETWORK)? {
            Some(summary) => Ok(summary.fee),
            // Unreachable: every ancestor was checked for a payload above.
            None => Err(GraphError::InputNotFound(tx.txid())),
        }
    }

    /// Fee and tracked-address value of every node reachable from the
    /// frontier that has at least one ancestor.
    ///
    /// `addresses` may be a single address or a collection; `network`
    /// defaults to [`DEFAULT_NETWORK`]. Entries are `None` when a funding
    /// transaction is still a placeholder.
    ///
    /// The graph must bottom out at unknown funding transactions or at known
    /// transactions that spend nothing (coinbases, input-less payloads), and
    /// the transactions spending unknown funds must not pay to a tracked
    /// address. Otherwise value flowing into the tracked set would be missed,
    /// and a [`GraphError::Precondition`] is returned.
    pub fn fees_and_values(
        &self,
        addresses: impl Into<AddressSet>,
        network: Option<Network>,
    ) -> Result<BTreeMap<Txid, Option<FeeAndValue>>, GraphError> {
        let addresses = addresses.into();
        let network = network.unwrap_or(DEFAULT_NETWORK);

        self.check_tails(&addresses, network)?;

        let mut results = BTreeMap::new();
        let mut visited: HashSet<Txid> = HashSet::new();
        let mut stack: Vec<Txid> = self.frontier.iter().copied().collect();

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if node.ancestors().is_empty() {
                continue;
            }
            let Some(tx) = node.tx() else {
                continue;
            };

            let ancestors: Vec<&Node<T>> = node
                .ancestors()
                .iter()
                .filter_map(|ancestor| self.nodes.get(ancestor))
                .collect();
            results.insert(id, fees::fee_and_value(tx, &ancestors, &addresses, network)?);
            stack.extend(node.ancestors().iter().copied());
        }

        tracing::debug!(
            entries = results.len(),
            tracked_addresses = addresses.len(),
            %network,
            "computed fees and values"
        );
        Ok(results)
    }

    fn check_tails(&self, addresses: &AddressSet, network: Network) -> Result<(), GraphError> {
        for tail in self.tails() {
            match tail.tx() {
                Some(tx) if tx.prevouts().next().is_some() => {
                    tracing::warn!(txid = %tail.id(), "graph tail spends inputs it is not linked to");
                    return Err(PreconditionError::KnownTail(tail.id()).into());
                }
                Some(_) => {}
                None => {
                    for spender_id in tail.spenders().values() {
                        let Some(spender) = self.nodes.get(spender_id).and_then(Node::tx) else {
                            continue;
                        };
                        if fees::pays_to(spender, addresses, network) {
                            tracing::warn!(
                                txid = %spender_id,
                                funding = %tail.id(),
                                "tracked address funded from outside the graph"
                            );
                            return Err(PreconditionError::ExternallyFunded(*spender_id).into());
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

// ==============================================================================
// Tests
// ==============================================================================
