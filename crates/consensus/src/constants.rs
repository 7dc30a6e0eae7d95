//! Consensus constants.

use voltic_primitives::{b256, B256};

/// The intrinsic gas of the simplest possible transaction.
pub const MIN_TRANSACTION_GAS: u64 = 21_000;

/// Keccak-256 hash of the RLP of an empty list; the ommers hash of every
/// post-merge block.
pub const EMPTY_OMMER_ROOT_HASH: B256 =
    b256!("1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347");

/// Root hash of an empty trie.
pub const EMPTY_ROOT_HASH: B256 =
    b256!("56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421");

/// Keccak-256 hash of the empty byte string; the code hash of an account
/// without code.
pub const KECCAK_EMPTY: B256 =
    b256!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470");

#[cfg(test)]
mod tests {
    use super::*;
    use voltic_primitives::keccak256;

    #[test]
    fn empty_hashes() {
        assert_eq!(keccak256([]), KECCAK_EMPTY);
        assert_eq!(keccak256([0xc0u8]), EMPTY_OMMER_ROOT_HASH);
    }
}
