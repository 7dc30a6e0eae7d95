//! [EIP-7702] protocol constants.
//!
//! [EIP-7702]: https://eips.ethereum.org/EIPS/eip-7702

/// The tag byte prepended to the authorization preimage before hashing.
///
/// This is a domain separator, not a transaction type byte: it keeps
/// authorization signatures from colliding with transaction signatures.
pub const MAGIC: u8 = 0x05;

/// The [EIP-2718] type byte of a set-code transaction.
///
/// [EIP-2718]: https://eips.ethereum.org/EIPS/eip-2718
pub const EIP7702_TX_TYPE_ID: u8 = 0x04;

/// Gas charged per authorization-list item.
pub const PER_AUTH_BASE_COST: u64 = 12_500;

/// Additional gas charged per authorization whose authority account is
/// empty.
pub const PER_EMPTY_ACCOUNT_COST: u64 = 25_000;

/// The intrinsic gas an authorization list adds to its transaction.
pub const fn authorization_list_gas(authorizations: u64, empty_accounts: u64) -> u64 {
    authorizations * PER_AUTH_BASE_COST + empty_accounts * PER_EMPTY_ACCOUNT_COST
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_gas() {
        // three authorizations, two of which touch empty accounts
        assert_eq!(authorization_list_gas(3, 2), 3 * 12_500 + 2 * 25_000);
        assert_eq!(authorization_list_gas(3, 2), 87_500);
        assert_eq!(authorization_list_gas(0, 0), 0);
    }
}
