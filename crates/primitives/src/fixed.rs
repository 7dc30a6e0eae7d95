use core::{fmt, ops, str::FromStr};
use voltic_rlp::{Decodable, Encodable};

/// A byte array of fixed length `N`.
///
/// Displays and parses as canonical lowercase 0x-prefixed hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct FixedBytes<const N: usize>(pub [u8; N]);

impl<const N: usize> Default for FixedBytes<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

/// The error returned when constructing a [`FixedBytes`] from input of the
/// wrong size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid length: expected {expected} bytes, got {got}")]
pub struct InvalidLength {
    /// The required byte count.
    pub expected: usize,
    /// The byte count received.
    pub got: usize,
}

impl<const N: usize> FixedBytes<N> {
    /// The all-zero value.
    pub const ZERO: Self = Self([0u8; N]);

    /// The number of bytes.
    pub const LEN: usize = N;

    /// Wraps the given array.
    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Creates a value with every byte set to `byte`.
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; N])
    }

    /// Copies from a slice, which must be exactly `N` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `src` is not exactly `N` bytes long. Use
    /// [`Self::try_from_slice`] for a fallible version.
    #[track_caller]
    pub fn from_slice(src: &[u8]) -> Self {
        Self(src.try_into().expect("slice length mismatch"))
    }

    /// Copies from a slice, failing if the length does not match.
    pub fn try_from_slice(src: &[u8]) -> Result<Self, InvalidLength> {
        src.try_into()
            .map(Self)
            .map_err(|_| InvalidLength { expected: N, got: src.len() })
    }

    /// Left-pads a short slice with zeros to `N` bytes.
    ///
    /// Fails if `src` is longer than `N`.
    pub fn left_padding_from(src: &[u8]) -> Result<Self, InvalidLength> {
        if src.len() > N {
            return Err(InvalidLength { expected: N, got: src.len() });
        }
        let mut bytes = [0u8; N];
        bytes[N - src.len()..].copy_from_slice(src);
        Ok(Self(bytes))
    }

    /// Right-pads a short slice with zeros to `N` bytes.
    ///
    /// Fails if `src` is longer than `N`.
    pub fn right_padding_from(src: &[u8]) -> Result<Self, InvalidLength> {
        if src.len() > N {
            return Err(InvalidLength { expected: N, got: src.len() });
        }
        let mut bytes = [0u8; N];
        bytes[..src.len()].copy_from_slice(src);
        Ok(Self(bytes))
    }

    /// Borrows the bytes as a slice.
    pub const fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Returns the underlying array.
    pub const fn into_array(self) -> [u8; N] {
        self.0
    }

    /// True if every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// The number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.0.iter().map(|b| b.count_ones()).sum()
    }
}

impl<const N: usize> AsRef<[u8]> for FixedBytes<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> AsMut<[u8]> for FixedBytes<N> {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl<const N: usize> ops::Deref for FixedBytes<N> {
    type Target = [u8; N];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const N: usize> ops::DerefMut for FixedBytes<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<const N: usize> From<[u8; N]> for FixedBytes<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> From<FixedBytes<N>> for [u8; N] {
    fn from(bytes: FixedBytes<N>) -> Self {
        bytes.0
    }
}

impl<const N: usize> TryFrom<&[u8]> for FixedBytes<N> {
    type Error = InvalidLength;

    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        Self::try_from_slice(src)
    }
}

impl<const N: usize> ops::BitOrAssign for FixedBytes<N> {
    fn bitor_assign(&mut self, rhs: Self) {
        for (lhs, rhs) in self.0.iter_mut().zip(rhs.0) {
            *lhs |= rhs;
        }
    }
}

impl<const N: usize> ops::BitOr for FixedBytes<N> {
    type Output = Self;

    fn bitor(mut self, rhs: Self) -> Self {
        self |= rhs;
        self
    }
}

impl<const N: usize> ops::BitAndAssign for FixedBytes<N> {
    fn bitand_assign(&mut self, rhs: Self) {
        for (lhs, rhs) in self.0.iter_mut().zip(rhs.0) {
            *lhs &= rhs;
        }
    }
}

impl<const N: usize> ops::BitAnd for FixedBytes<N> {
    type Output = Self;

    fn bitand(mut self, rhs: Self) -> Self {
        self &= rhs;
        self
    }
}

impl<const N: usize> fmt::Display for FixedBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl<const N: usize> fmt::Debug for FixedBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl<const N: usize> fmt::LowerHex for FixedBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&const_hex::encode_prefixed(self.0))
    }
}

impl<const N: usize> fmt::UpperHex for FixedBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        f.write_str(&const_hex::encode_upper(self.0))
    }
}

impl<const N: usize> FromStr for FixedBytes<N> {
    type Err = const_hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const_hex::decode_to_array(s).map(Self)
    }
}

impl<const N: usize> Encodable for FixedBytes<N> {
    fn encode(&self, out: &mut dyn voltic_rlp::BufMut) {
        self.0.encode(out)
    }

    fn length(&self) -> usize {
        self.0.length()
    }
}

impl<const N: usize> Decodable for FixedBytes<N> {
    fn decode(buf: &mut &[u8]) -> voltic_rlp::Result<Self> {
        <[u8; N]>::decode(buf).map(Self)
    }
}

#[cfg(feature = "serde")]
impl<const N: usize> serde::Serialize for FixedBytes<N> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&const_hex::encode_prefixed(self.0))
    }
}

#[cfg(feature = "serde")]
impl<'de, const N: usize> serde::Deserialize<'de> for FixedBytes<N> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(any(test, feature = "arbitrary"))]
impl<'a, const N: usize> arbitrary::Arbitrary<'a> for FixedBytes<N> {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let mut bytes = [0u8; N];
        u.fill_buffer(&mut bytes)?;
        Ok(Self(bytes))
    }
}
