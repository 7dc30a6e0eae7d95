//! [EIP-1559] fee-market arithmetic.
//!
//! [EIP-1559]: https://eips.ethereum.org/EIPS/eip-1559

/// The base fee of the first EIP-1559 block, in wei.
pub const INITIAL_BASE_FEE: u64 = 1_000_000_000;

/// The bound on how far a block's gas usage may deviate from its target.
pub const ELASTICITY_MULTIPLIER: u64 = 2;

/// The divisor bounding per-block base-fee movement.
pub const BASE_FEE_MAX_CHANGE_DENOMINATOR: u64 = 8;

/// The price actually paid per unit of gas by a dynamic-fee transaction:
/// `min(base_fee + max_priority_fee, max_fee)`.
///
/// Without a base fee (pre-London context) the cap itself is returned.
/// The clamp is the documented fee semantics, not an error condition.
pub const fn effective_gas_price(
    max_fee_per_gas: u128,
    max_priority_fee_per_gas: u128,
    base_fee: Option<u64>,
) -> u128 {
    match base_fee {
        None => max_fee_per_gas,
        Some(base_fee) => {
            let base_fee = base_fee as u128;
            let tip = max_fee_per_gas.saturating_sub(base_fee);
            if tip > max_priority_fee_per_gas {
                max_priority_fee_per_gas + base_fee
            } else {
                max_fee_per_gas
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_at_max_fee() {
        // base 100 + tip 50 would be 150, capped at 120
        assert_eq!(effective_gas_price(120, 50, Some(100)), 120);
    }

    #[test]
    fn pays_base_plus_tip_when_under_cap() {
        assert_eq!(effective_gas_price(200, 50, Some(100)), 150);
    }

    #[test]
    fn no_base_fee_returns_cap() {
        assert_eq!(effective_gas_price(200, 50, None), 200);
    }

    #[test]
    fn base_fee_above_cap_still_clamps() {
        assert_eq!(effective_gas_price(90, 10, Some(100)), 90);
    }
}
