//! Fee and address-value computation for a single transaction.
//!
//! The fee of a transaction is the value of the outputs it spends minus the
//! value of the outputs it creates. The value relative to an [`AddressSet`]
//! is what the set received in this transaction minus what it spent.

use std::collections::BTreeSet;

use bitcoin::{Amount, Network, Script, SignedAmount};
use serde::Serialize;

use crate::address::output_address;
use crate::error::GraphError;
use crate::node::Node;
use crate::types::GraphTx;

// ==============================================================================
// Address Set
// ==============================================================================

/// The addresses whose value flow is tracked.
///
/// A single address converts into a one-element set, so callers can pass
/// either `"bc1q..."` or a collection of addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressSet(BTreeSet<String>);

impl AddressSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.0.contains(address)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<&str> for AddressSet {
    fn from(address: &str) -> Self {
        Self(BTreeSet::from([address.to_owned()]))
    }
}

impl From<String> for AddressSet {
    fn from(address: String) -> Self {
        Self(BTreeSet::from([address]))
    }
}

impl From<Vec<String>> for AddressSet {
    fn from(addresses: Vec<String>) -> Self {
        addresses.into_iter().collect()
    }
}

impl From<&[&str]> for AddressSet {
    fn from(addresses: &[&str]) -> Self {
        addresses.iter().copied().collect()
    }
}

impl<const N: usize> From<[&str; N]> for AddressSet {
    fn from(addresses: [&str; N]) -> Self {
        addresses.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for AddressSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// ==============================================================================
// Fee and Value
// ==============================================================================

/// Fee and tracked-address value of one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeAndValue {
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub fee: SignedAmount,
    /// Net value received by the tracked addresses. `None` when the
    /// transaction neither spends from nor pays to any of them.
    #[serde(with = "bitcoin::amount::serde::as_sat::opt")]
    pub value: Option<SignedAmount>,
}

/// Running totals for one side (inputs or outputs) of a transaction.
struct Tally {
    total: SignedAmount,
    tracked: SignedAmount,
    relevant: bool,
}

impl Tally {
    fn new() -> Self {
        Self {
            total: SignedAmount::ZERO,
            tracked: SignedAmount::ZERO,
            relevant: false,
        }
    }

    /// Add one amount. `None` when a running total leaves the signed range.
    fn record(&mut self, value: Amount, tracked: bool) -> Option<()> {
        let value = value.to_signed().ok()?;
        self.total = self.total.checked_add(value)?;
        if tracked {
            self.tracked = self.tracked.checked_add(value)?;
            self.relevant = true;
        }
        Some(())
    }
}

/// Compute the fee and tracked value of `tx` given the nodes funding it.
///
/// Returns `Ok(None)` when one of the funding nodes is still a placeholder,
/// since the spent output values are not known yet. Sums that overflow a
/// signed satoshi amount yield [`GraphError::AmountOverflow`].
pub(crate) fn fee_and_value<T: GraphTx>(
    tx: &T,
    ancestors: &[&Node<T>],
    addresses: &AddressSet,
    network: Network,
) -> Result<Option<FeeAndValue>, GraphError> {
    let tracked = |script: &Script| is_tracked(script, addresses, network);
    let overflow = || GraphError::AmountOverflow(tx.txid());

    let mut inputs = Tally::new();
    for prevout in tx.prevouts() {
        let ancestor = ancestors
            .iter()
            .find(|node| node.id() == prevout.txid)
            .ok_or(GraphError::MissingAncestor(prevout.txid))?;

        let Some(funding_tx) = ancestor.tx() else {
            return Ok(None);
        };

        let (value, script) = funding_tx
            .output(prevout.vout)
            .ok_or(GraphError::MissingOutput {
                txid: prevout.txid,
                vout: prevout.vout,
            })?;
        inputs.record(value, tracked(script)).ok_or_else(overflow)?;
    }

    let mut outputs = Tally::new();
    for (value, script) in tx.outputs() {
        outputs.record(value, tracked(script)).ok_or_else(overflow)?;
    }

    let fee = inputs.total.checked_sub(outputs.total).ok_or_else(overflow)?;
    let value = if inputs.relevant || outputs.relevant {
        Some(outputs.tracked.checked_sub(inputs.tracked).ok_or_else(overflow)?)
    } else {
        None
    };
    Ok(Some(FeeAndValue { fee, value }))
}

/// Whether any output of `tx` pays to an address in `addresses`.
pub(crate) fn pays_to<T: GraphTx>(tx: &T, addresses: &AddressSet, network: Network) -> bool {
    tx.outputs()
        .any(|(_, script)| is_tracked(script, addresses, network))
}

fn is_tracked(script: &Script, addresses: &AddressSet, network: Network) -> bool {
    !addresses.is_empty()
        && output_address(script, network).is_some_and(|address| addresses.contains(&address))
}
