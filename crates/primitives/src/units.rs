//! Ether denomination parsing, formatting, and conversion.

use crate::U256;
use core::{fmt, str::FromStr};

/// One gwei in wei.
pub const GWEI_TO_WEI: u64 = 1_000_000_000;

/// One ether in wei.
pub const WEI_IN_ETHER: U256 = U256::from_limbs([0x0de0_b6b3_a764_0000, 0, 0, 0]);

/// A power-of-ten denomination exponent.
///
/// `Unit::ETHER` is `10^18` wei, `Unit::GWEI` is `10^9` wei.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Unit(u8);

/// Errors parsing or converting denominated amounts.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UnitsError {
    /// The unit name or exponent is not recognized.
    #[error("invalid unit: {0:?}")]
    InvalidUnit(String),
    /// The amount string is not a valid decimal number.
    #[error("invalid decimal amount: {0:?}")]
    InvalidAmount(String),
    /// The amount has more fractional digits than the unit holds.
    #[error("fractional part exceeds unit precision")]
    FractionalTooPrecise,
    /// The scaled amount exceeds the 256-bit domain.
    #[error("amount too large for a 256-bit integer")]
    Overflow,
}

impl Unit {
    /// Wei: exponent 0.
    pub const WEI: Self = Self(0);
    /// Kwei: exponent 3.
    pub const KWEI: Self = Self(3);
    /// Mwei: exponent 6.
    pub const MWEI: Self = Self(6);
    /// Gwei: exponent 9.
    pub const GWEI: Self = Self(9);
    /// Szabo: exponent 12.
    pub const SZABO: Self = Self(12);
    /// Finney: exponent 15.
    pub const FINNEY: Self = Self(15);
    /// Ether: exponent 18.
    pub const ETHER: Self = Self(18);

    /// The largest exponent whose power of ten fits in a [`U256`].
    pub const MAX: Self = Self(77);

    /// Creates a unit from an exponent, failing above [`Unit::MAX`].
    pub fn new(exponent: u8) -> Result<Self, UnitsError> {
        if exponent > Self::MAX.0 {
            return Err(UnitsError::InvalidUnit(exponent.to_string()));
        }
        Ok(Self(exponent))
    }

    /// The exponent.
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// The number of wei in one of this unit.
    pub fn wei(&self) -> U256 {
        U256::from(10u64).pow(U256::from(self.0))
    }
}

impl FromStr for Unit {
    type Err = UnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wei" => Ok(Self::WEI),
            "kwei" | "babbage" => Ok(Self::KWEI),
            "mwei" | "lovelace" => Ok(Self::MWEI),
            "gwei" | "shannon" => Ok(Self::GWEI),
            "szabo" => Ok(Self::SZABO),
            "finney" => Ok(Self::FINNEY),
            "ether" | "eth" => Ok(Self::ETHER),
            other => other
                .parse::<u8>()
                .map_err(|_| UnitsError::InvalidUnit(s.into()))
                .and_then(Self::new),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "10^{}", self.0)
    }
}

/// Parses a decimal amount denominated in `unit` into wei.
///
/// `parse_units("1.5", Unit::GWEI)` is `1_500_000_000` wei. Fractional
/// digits beyond the unit's precision and results above `U256::MAX` are
/// errors.
pub fn parse_units(amount: &str, unit: Unit) -> Result<U256, UnitsError> {
    let amount = amount.trim();
    let (integer, fraction) = match amount.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (amount, ""),
    };

    if integer.is_empty() && fraction.is_empty() {
        return Err(UnitsError::InvalidAmount(amount.into()));
    }
    if !integer.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(UnitsError::InvalidAmount(amount.into()));
    }
    if fraction.len() > unit.get() as usize {
        return Err(UnitsError::FractionalTooPrecise);
    }

    let integer: U256 = if integer.is_empty() {
        U256::ZERO
    } else {
        integer.parse().map_err(|_| UnitsError::InvalidAmount(amount.into()))?
    };
    let fraction_scale = U256::from(10u64).pow(U256::from(unit.get() as usize - fraction.len()));
    let fraction: U256 = if fraction.is_empty() {
        U256::ZERO
    } else {
        fraction.parse().map_err(|_| UnitsError::InvalidAmount(amount.into()))?
    };

    let fraction = fraction.checked_mul(fraction_scale).ok_or(UnitsError::Overflow)?;
    integer
        .checked_mul(unit.wei())
        .and_then(|scaled| scaled.checked_add(fraction))
        .ok_or(UnitsError::Overflow)
}

/// Parses a decimal ether amount into wei.
pub fn parse_ether(amount: &str) -> Result<U256, UnitsError> {
    parse_units(amount, Unit::ETHER)
}

/// Formats a wei amount as a decimal string denominated in `unit`.
///
/// Trailing fractional zeros are trimmed; whole amounts render without a
/// decimal point.
pub fn format_units(amount: U256, unit: Unit) -> String {
    let divisor = unit.wei();
    let integer = amount / divisor;
    let remainder = amount % divisor;

    if remainder == U256::ZERO {
        return integer.to_string();
    }

    let fraction = format!("{remainder:0>width$}", width = unit.get() as usize);
    let fraction = fraction.trim_end_matches('0');
    format!("{integer}.{fraction}")
}

/// Formats a wei amount as ether.
pub fn format_ether(amount: U256) -> String {
    format_units(amount, Unit::ETHER)
}
