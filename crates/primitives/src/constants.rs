//! Protocol-wide constants and well-known selectors.

use crate::{Selector, B256};

/// Keccak-256 hash of the empty byte string.
pub const KECCAK256_EMPTY: B256 =
    crate::B256::new(crate::hex_literal::hex!(
        "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
    ));

/// SHA-256 hash of the empty byte string.
pub const SHA256_EMPTY: B256 = crate::B256::new(crate::hex_literal::hex!(
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
));

/// Selector of `transfer(address,uint256)`.
pub const ERC20_TRANSFER_SELECTOR: Selector =
    crate::FixedBytes(crate::hex_literal::hex!("a9059cbb"));

/// Selector of `balanceOf(address)`.
pub const ERC20_BALANCE_OF_SELECTOR: Selector =
    crate::FixedBytes(crate::hex_literal::hex!("70a08231"));

/// Selector of `approve(address,uint256)`.
pub const ERC20_APPROVE_SELECTOR: Selector =
    crate::FixedBytes(crate::hex_literal::hex!("095ea7b3"));

/// Topic of the `Transfer(address,address,uint256)` event, shared by
/// ERC-20 and ERC-721.
pub const TRANSFER_EVENT_TOPIC: B256 = crate::B256::new(crate::hex_literal::hex!(
    "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
));

/// Topic of the `Approval(address,address,uint256)` event.
pub const APPROVAL_EVENT_TOPIC: B256 = crate::B256::new(crate::hex_literal::hex!(
    "8c5be1e5ebec7d5bd14f71427d1e84f3dd0314c0f7b2291e5b200ac8c7c3b925"
));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keccak256;

    #[test]
    fn selectors_match_their_signatures() {
        assert_eq!(
            keccak256(b"transfer(address,uint256)")[..4],
            ERC20_TRANSFER_SELECTOR[..]
        );
        assert_eq!(keccak256(b"balanceOf(address)")[..4], ERC20_BALANCE_OF_SELECTOR[..]);
        assert_eq!(keccak256(b"approve(address,uint256)")[..4], ERC20_APPROVE_SELECTOR[..]);
        assert_eq!(keccak256(b"Transfer(address,address,uint256)"), TRANSFER_EVENT_TOPIC);
        assert_eq!(keccak256(b"Approval(address,address,uint256)"), APPROVAL_EVENT_TOPIC);
    }

    #[test]
    fn empty_hash() {
        assert_eq!(keccak256([]), KECCAK256_EMPTY);
    }
}
