//! Shared test helpers for `txgraph-core` unit tests.
//!
//! Builder functions for transactions, inputs, and outputs so that tests
//! across modules share a single source of truth for dummy data.

use bitcoin::hashes::Hash;
use bitcoin::transaction::Version;
use bitcoin::{
    absolute, Address, Amount, Network, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut,
    Txid, WPubkeyHash, Witness,
};

// ==============================================================================
// Txid Helpers
// ==============================================================================

/// Create a deterministic `Txid` from a single distinguishing byte.
pub fn txid_from_byte(b: u8) -> Txid {
    let mut bytes = [0u8; 32];
    bytes[0] = b;
    Txid::from_byte_array(bytes)
}

// ==============================================================================
// Script and Address Helpers
// ==============================================================================

/// A P2WPKH script whose key hash is filled with `tag`. Distinct tags give
/// distinct addresses.
pub fn p2wpkh_script(tag: u8) -> ScriptBuf {
    ScriptBuf::new_p2wpkh(&WPubkeyHash::from_byte_array([tag; 20]))
}

/// Mainnet address of [`p2wpkh_script`] for `tag`.
pub fn address_of(tag: u8) -> String {
    Address::from_script(&p2wpkh_script(tag), Network::Bitcoin)
        .expect("p2wpkh script has an address")
        .to_string()
}

/// `OP_RETURN PUSH3 <01 02 03>`.
pub fn op_return_script() -> ScriptBuf {
    ScriptBuf::from_bytes(vec![0x6a, 0x03, 0x01, 0x02, 0x03])
}

// ==============================================================================
// Transaction Builders
// ==============================================================================

/// A coinbase input. `tag` lands in the script sig so that otherwise
/// identical coinbase transactions get distinct txids.
pub fn coinbase_input(tag: u8) -> TxIn {
    TxIn {
        previous_output: OutPoint::null(),
        script_sig: ScriptBuf::from_bytes(vec![0x01, tag]),
        sequence: Sequence::MAX,
        witness: Witness::new(),
    }
}

/// A spending input referencing `funding_txid:vout`.
pub fn spending_input(funding_txid: Txid, vout: u32) -> TxIn {
    TxIn {
        previous_output: OutPoint::new(funding_txid, vout),
        script_sig: ScriptBuf::new(),
        sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
        witness: Witness::new(),
    }
}

/// An output paying `sats` to the address of [`p2wpkh_script`] for `tag`.
pub fn output_to(tag: u8, sats: u64) -> TxOut {
    TxOut {
        value: Amount::from_sat(sats),
        script_pubkey: p2wpkh_script(tag),
    }
}

pub fn op_return_output() -> TxOut {
    TxOut {
        value: Amount::ZERO,
        script_pubkey: op_return_script(),
    }
}

pub fn make_tx(input: Vec<TxIn>, output: Vec<TxOut>) -> Transaction {
    Transaction {
        version: Version::TWO,
        lock_time: absolute::LockTime::ZERO,
        input,
        output,
    }
}
