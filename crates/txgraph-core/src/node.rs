use std::collections::BTreeMap;

use bitcoin::Txid;

use crate::types::NodeSummary;

/// A vertex of the spend graph: one transaction identity.
///
/// Nodes hold the ids of their neighbours rather than references; the
/// owning [`crate::TxGraph`] resolves them. A node without a payload is a
/// placeholder, known only because another transaction spends one of its
/// outputs.
#[derive(Debug, Clone)]
pub struct Node<T> {
    id: Txid,
    tx: Option<T>,
    ancestors: Vec<Txid>,
    spenders: BTreeMap<u32, Txid>,
}

impl<T> Node<T> {
    pub(crate) fn new(id: Txid) -> Self {
        Self {
            id,
            tx: None,
            ancestors: Vec::new(),
            spenders: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> Txid {
        self.id
    }

    pub fn tx(&self) -> Option<&T> {
        self.tx.as_ref()
    }

    pub fn is_placeholder(&self) -> bool {
        self.tx.is_none()
    }

    /// Ids of the nodes whose outputs this node spends, in first-spent order.
    pub fn ancestors(&self) -> &[Txid] {
        &self.ancestors
    }

    /// Spending node per output index. Unspent (or not yet known spent)
    /// outputs are absent.
    pub fn spenders(&self) -> &BTreeMap<u32, Txid> {
        &self.spenders
    }

    pub fn spender(&self, vout: u32) -> Option<Txid> {
        self.spenders.get(&vout).copied()
    }

    /// Owned, serializable copy of this node's adjacency.
    pub fn summary(&self) -> NodeSummary {
        NodeSummary {
            txid: self.id,
            placeholder: self.is_placeholder(),
            ancestors: self.ancestors.clone(),
            spenders: self.spenders.clone(),
        }
    }

    pub(crate) fn set_tx(&mut self, tx: T) {
        self.tx = Some(tx);
    }

    /// Returns `false` if `id` was already listed.
    pub(crate) fn push_ancestor(&mut self, id: Txid) -> bool {
        if self.ancestors.contains(&id) {
            return false;
        }
        self.ancestors.push(id);
        true
    }

    pub(crate) fn set_spender(&mut self, vout: u32, spender: Txid) {
        self.spenders.insert(vout, spender);
    }
}
