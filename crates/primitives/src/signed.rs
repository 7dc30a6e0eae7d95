use core::{cmp::Ordering, fmt, str::FromStr};
use ruint::Uint;

/// A fixed-width signed integer in two's-complement representation over
/// a [`ruint::Uint`] of the same width.
///
/// The width aliases [`I8`] through [`I256`] pair with the unsigned
/// [`U8`](crate::U8) through [`U256`] family. Arithmetic is checked:
/// operations that would leave the `BITS`-bit domain return `None`
/// rather than wrapping.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Signed<const BITS: usize, const LIMBS: usize>(Uint<BITS, LIMBS>);

/// An 8-bit signed integer.
pub type I8 = Signed<8, 1>;

/// A 16-bit signed integer.
pub type I16 = Signed<16, 1>;

/// A 32-bit signed integer.
pub type I32 = Signed<32, 1>;

/// A 64-bit signed integer.
pub type I64 = Signed<64, 1>;

/// A 128-bit signed integer.
pub type I128 = Signed<128, 2>;

/// A 256-bit signed integer.
pub type I256 = Signed<256, 4>;

/// The error returned when parsing or converting into a [`Signed`]
/// overflows its domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("value out of range for the signed integer width")]
pub struct SignedOverflow;

impl<const BITS: usize, const LIMBS: usize> Signed<BITS, LIMBS> {
    /// Zero.
    pub const ZERO: Self = Self(Uint::ZERO);

    /// One.
    pub const ONE: Self = {
        let mut limbs = [0u64; LIMBS];
        limbs[0] = 1;
        Self(Uint::from_limbs(limbs))
    };

    /// Negative one (all bits set).
    pub const MINUS_ONE: Self = Self(Uint::MAX);

    /// The smallest representable value, `-2^(BITS-1)`: the sign bit
    /// alone.
    pub const MIN: Self = {
        let mut limbs = [0u64; LIMBS];
        limbs[LIMBS - 1] = 1 << ((BITS - 1) % 64);
        Self(Uint::from_limbs(limbs))
    };

    /// The largest representable value, `2^(BITS-1) - 1`: every bit
    /// below the sign bit.
    pub const MAX: Self = {
        let mut limbs = [u64::MAX; LIMBS];
        limbs[LIMBS - 1] = (1u64 << ((BITS - 1) % 64)) - 1;
        Self(Uint::from_limbs(limbs))
    };

    /// Reinterprets raw two's-complement bits.
    pub const fn from_raw(raw: Uint<BITS, LIMBS>) -> Self {
        Self(raw)
    }

    /// The raw two's-complement bits.
    pub const fn into_raw(self) -> Uint<BITS, LIMBS> {
        self.0
    }

    /// True if the value is negative.
    pub fn is_negative(&self) -> bool {
        self.0.bit(BITS - 1)
    }

    /// True if the value is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == Uint::ZERO
    }

    /// The unsigned magnitude.
    pub fn unsigned_abs(&self) -> Uint<BITS, LIMBS> {
        if self.is_negative() {
            self.0.wrapping_neg()
        } else {
            self.0
        }
    }

    /// Checked negation; fails only for [`Self::MIN`].
    pub fn checked_neg(self) -> Option<Self> {
        if self == Self::MIN {
            None
        } else {
            Some(Self(self.0.wrapping_neg()))
        }
    }

    /// Checked addition.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        let sum = Self(self.0.wrapping_add(rhs.0));
        // overflow iff operands share a sign the result does not
        if self.is_negative() == rhs.is_negative() && sum.is_negative() != self.is_negative() {
            None
        } else {
            Some(sum)
        }
    }

    /// Checked subtraction.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        let diff = Self(self.0.wrapping_sub(rhs.0));
        // overflow iff operands differ in sign and the result flips away
        // from the minuend's sign
        if self.is_negative() != rhs.is_negative() && diff.is_negative() != self.is_negative() {
            None
        } else {
            Some(diff)
        }
    }

    /// Converts an unsigned magnitude, failing above [`Self::MAX`].
    pub fn try_from_unsigned(value: Uint<BITS, LIMBS>) -> Result<Self, SignedOverflow> {
        if value > Self::MAX.0 {
            return Err(SignedOverflow);
        }
        Ok(Self(value))
    }

    /// Converts a negated unsigned magnitude, failing below
    /// [`Self::MIN`].
    pub fn try_from_negated(magnitude: Uint<BITS, LIMBS>) -> Result<Self, SignedOverflow> {
        if magnitude > Self::MIN.unsigned_abs() {
            return Err(SignedOverflow);
        }
        Ok(Self(magnitude.wrapping_neg()))
    }

    /// Converts a big-endian two's-complement byte slice of at most the
    /// type's width, sign-extending shorter input.
    pub fn try_from_be_slice(bytes: &[u8]) -> Result<Self, SignedOverflow> {
        if bytes.len() > Uint::<BITS, LIMBS>::BYTES {
            return Err(SignedOverflow);
        }
        let negative = bytes.first().is_some_and(|b| b & 0x80 != 0);
        let value = Uint::try_from_be_slice(bytes).ok_or(SignedOverflow)?;
        if negative && bytes.len() * 8 < BITS {
            // fill the missing high bits with the sign
            Ok(Self(value | Uint::MAX.wrapping_shl(bytes.len() * 8)))
        } else {
            Ok(Self(value))
        }
    }

    /// The big-endian two's-complement representation.
    ///
    /// `BYTES` must be the type's width in bytes, as with
    /// [`ruint::Uint::to_be_bytes`].
    pub fn to_be_bytes<const BYTES: usize>(self) -> [u8; BYTES] {
        self.0.to_be_bytes()
    }
}

impl<const BITS: usize, const LIMBS: usize> TryFrom<i128> for Signed<BITS, LIMBS> {
    type Error = SignedOverflow;

    fn try_from(value: i128) -> Result<Self, Self::Error> {
        let magnitude =
            Uint::try_from(value.unsigned_abs()).map_err(|_| SignedOverflow)?;
        if value < 0 {
            Self::try_from_negated(magnitude)
        } else {
            Self::try_from_unsigned(magnitude)
        }
    }
}

impl<const BITS: usize, const LIMBS: usize> TryFrom<i64> for Signed<BITS, LIMBS> {
    type Error = SignedOverflow;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_from(value as i128)
    }
}

impl<const BITS: usize, const LIMBS: usize> TryFrom<Uint<BITS, LIMBS>>
    for Signed<BITS, LIMBS>
{
    type Error = SignedOverflow;

    fn try_from(value: Uint<BITS, LIMBS>) -> Result<Self, Self::Error> {
        Self::try_from_unsigned(value)
    }
}

impl<const BITS: usize, const LIMBS: usize> PartialOrd for Signed<BITS, LIMBS> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const BITS: usize, const LIMBS: usize> Ord for Signed<BITS, LIMBS> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            // same sign: two's-complement order matches unsigned order
            _ => self.0.cmp(&other.0),
        }
    }
}

impl<const BITS: usize, const LIMBS: usize> fmt::Display for Signed<BITS, LIMBS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}", self.unsigned_abs())
        } else {
            fmt::Display::fmt(&self.0, f)
        }
    }
}

impl<const BITS: usize, const LIMBS: usize> fmt::Debug for Signed<BITS, LIMBS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<const BITS: usize, const LIMBS: usize> FromStr for Signed<BITS, LIMBS> {
    type Err = SignedOverflow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let magnitude: Uint<BITS, LIMBS> = digits.parse().map_err(|_| SignedOverflow)?;
        if negative {
            Self::try_from_negated(magnitude)
        } else {
            Self::try_from_unsigned(magnitude)
        }
    }
}

/// Convenience parser for the common 256-bit width.
impl I256 {
    /// Parses a decimal string with an optional sign, as [`FromStr`].
    pub fn from_dec_str(s: &str) -> Result<Self, SignedOverflow> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants() {
        assert_eq!(I256::ZERO.checked_sub(I256::ONE).unwrap(), I256::MINUS_ONE);
        assert_eq!(I256::MAX.checked_add(I256::ONE), None);
        assert_eq!(I256::MIN.checked_neg(), None);
        assert!(I256::MIN < I256::MINUS_ONE);
        assert!(I256::MINUS_ONE < I256::ZERO);
        assert!(I256::ZERO < I256::MAX);
    }

    #[test]
    fn every_width_has_the_right_bounds() {
        assert_eq!(I8::MAX, I8::try_from(127i64).unwrap());
        assert_eq!(I8::MIN, I8::try_from(-128i64).unwrap());
        assert!(I8::try_from(128i64).is_err());
        assert!(I8::try_from(-129i64).is_err());

        assert_eq!(I16::MAX, I16::try_from(i16::MAX as i64).unwrap());
        assert_eq!(I32::MIN, I32::try_from(i32::MIN as i64).unwrap());
        assert_eq!(I64::MAX, I64::try_from(i64::MAX).unwrap());
        assert_eq!(I128::MIN, I128::try_from(i128::MIN).unwrap());
        assert!(I64::try_from(i64::MAX as i128 + 1).is_err());
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("-123".parse::<I256>().unwrap(), I256::try_from(-123i64).unwrap());
        assert_eq!(I256::try_from(-123i64).unwrap().to_string(), "-123");
        assert_eq!("123".parse::<I256>().unwrap(), I256::try_from(123i64).unwrap());
        assert_eq!(I256::MIN.to_string().parse::<I256>().unwrap(), I256::MIN);

        assert_eq!("-128".parse::<I8>().unwrap(), I8::MIN);
        assert_eq!(I8::MIN.to_string(), "-128");
        assert!("-129".parse::<I8>().is_err());
        assert!("128".parse::<I8>().is_err());
    }

    #[test]
    fn be_slice_sign_extension() {
        assert_eq!(I256::try_from_be_slice(&[0xff]).unwrap(), I256::MINUS_ONE);
        assert_eq!(I256::try_from_be_slice(&[0x01]).unwrap(), I256::ONE);
        assert!(I256::try_from_be_slice(&[0u8; 33]).is_err());

        // a full-width slice needs no extension
        assert_eq!(I8::try_from_be_slice(&[0x80]).unwrap(), I8::MIN);
        assert_eq!(I16::try_from_be_slice(&[0xff]).unwrap(), I16::MINUS_ONE);
        assert!(I8::try_from_be_slice(&[0, 0]).is_err());
    }

    #[test]
    fn checked_arithmetic() {
        let a = I256::try_from(5i64).unwrap();
        let b = I256::try_from(-9i64).unwrap();
        assert_eq!(a.checked_add(b).unwrap(), I256::try_from(-4i64).unwrap());
        assert_eq!(b.checked_sub(a).unwrap(), I256::try_from(-14i64).unwrap());
        assert_eq!(I256::MIN.checked_sub(I256::ONE), None);

        // the same rules hold at the narrow end
        assert_eq!(I8::MIN.checked_sub(I8::ONE), None);
        assert_eq!(
            I8::try_from(-100i64).unwrap().checked_add(I8::try_from(-29i64).unwrap()),
            None
        );
        assert_eq!(
            I8::try_from(100i64).unwrap().checked_sub(I8::try_from(28i64).unwrap()),
            Some(I8::try_from(72i64).unwrap())
        );
    }

    #[test]
    fn round_trips_through_raw_bits() {
        let value = I128::try_from(-42i64).unwrap();
        assert_eq!(I128::from_raw(value.into_raw()), value);
        assert_eq!(value.unsigned_abs(), ruint::Uint::from(42u64));
    }
}
