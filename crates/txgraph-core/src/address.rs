//! Address decoding for output locking scripts.

use bitcoin::{Address, Network, Script};

/// Decode the address a locking script pays to on `network`.
///
/// Returns `None` for data-carrier outputs and for scripts without an
/// address form (bare pubkey, bare multisig, non-standard).
#[must_use]
pub fn output_address(script: &Script, network: Network) -> Option<String> {
    if script.is_op_return() {
        return None;
    }
    Address::from_script(script, network)
        .ok()
        .map(|address| address.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{op_return_script, p2wpkh_script};

    #[test]
    fn empty_script_has_no_address() {
        assert_eq!(output_address(Script::new(), Network::Bitcoin), None);
    }

    #[test]
    fn p2wpkh_decodes_to_network_specific_address() {
        let script = p2wpkh_script(7);
        let mainnet = output_address(&script, Network::Bitcoin).expect("mainnet address");
        let regtest = output_address(&script, Network::Regtest).expect("regtest address");

        assert!(mainnet.starts_with("bc1q"), "got {mainnet}");
        assert!(regtest.starts_with("bcrt1q"), "got {regtest}");
    }

    #[test]
    fn op_return_has_no_address() {
        assert_eq!(output_address(&op_return_script(), Network::Bitcoin), None);
    }

    #[test]
    fn non_standard_script_has_no_address() {
        let script = bitcoin::ScriptBuf::from_bytes(vec![0x51, 0x51, 0x87]);
        assert_eq!(output_address(&script, Network::Bitcoin), None);
    }
}
