use crate::{keccak256, B256, FixedBytes};
use core::{fmt, ops, str::FromStr};
use voltic_rlp::{Decodable, Encodable};

/// A 20-byte Ethereum account address.
///
/// [`fmt::Display`] renders the EIP-55 checksummed form; parsing accepts
/// any case and an optional 0x prefix.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Address(pub FixedBytes<20>);

/// Errors constructing or validating an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// The hex string was malformed.
    #[error(transparent)]
    Hex(#[from] const_hex::FromHexError),
    /// The mixed-case string failed its EIP-55 checksum.
    #[error("invalid EIP-55 checksum")]
    InvalidChecksum,
}

impl Address {
    /// The zero address.
    pub const ZERO: Self = Self(FixedBytes::ZERO);

    /// Wraps the given array.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(FixedBytes(bytes))
    }

    /// Copies from a slice, which must be exactly 20 bytes.
    ///
    /// # Panics
    ///
    /// Panics on length mismatch.
    #[track_caller]
    pub fn from_slice(src: &[u8]) -> Self {
        Self(FixedBytes::from_slice(src))
    }

    /// Copies from a slice, failing on length mismatch.
    pub fn try_from_slice(src: &[u8]) -> Result<Self, crate::InvalidLength> {
        FixedBytes::try_from_slice(src).map(Self)
    }

    /// Extracts an address from the last 20 bytes of a 32-byte word.
    pub fn from_word(word: B256) -> Self {
        Self::from_slice(&word[12..])
    }

    /// Left-pads the address into a 32-byte word.
    pub fn into_word(self) -> B256 {
        let mut word = B256::ZERO;
        word.0[12..].copy_from_slice(self.as_slice());
        word
    }

    /// Borrows the bytes as a slice.
    pub const fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// True if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns the EIP-55 checksummed string, including the 0x prefix.
    ///
    /// A hex digit is uppercased when the corresponding nibble of
    /// `keccak256(lowercase_hex_without_prefix)` is at least 8.
    pub fn to_checksum(&self) -> String {
        let lower = const_hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, ch) in lower.chars().enumerate() {
            let nibble = (hash[i / 2] >> (4 * (1 - i % 2))) & 0x0f;
            if nibble >= 8 {
                out.push(ch.to_ascii_uppercase());
            } else {
                out.push(ch);
            }
        }
        out
    }

    /// Parses a mixed-case address and verifies its EIP-55 checksum.
    ///
    /// All-lowercase and all-uppercase inputs carry no checksum and are
    /// accepted as-is.
    pub fn parse_checksummed(s: &str) -> Result<Self, AddressError> {
        let address: Self = s.parse().map_err(AddressError::Hex)?;
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let no_case =
            digits.chars().all(|c| !c.is_ascii_uppercase()) ||
            digits.chars().all(|c| !c.is_ascii_lowercase());
        if !no_case && address.to_checksum() != format!("0x{digits}") {
            return Err(AddressError::InvalidChecksum);
        }
        Ok(address)
    }

    /// Computes the address a `CREATE` deployment from this sender with the
    /// given nonce lands at: `keccak256(rlp([sender, nonce]))[12..]`.
    pub fn create(&self, nonce: u64) -> Self {
        let mut out = Vec::with_capacity(32);
        let payload_length = Encodable::length(&self.0) + Encodable::length(&nonce);
        voltic_rlp::Header { list: true, payload_length }.encode(&mut out);
        self.0.encode(&mut out);
        nonce.encode(&mut out);
        Self::from_word(keccak256(out))
    }

    /// Computes the `CREATE2` deployment address:
    /// `keccak256(0xff ‖ deployer ‖ salt ‖ init_code_hash)[12..]`.
    pub fn create2(&self, salt: B256, init_code_hash: B256) -> Self {
        let mut buf = [0u8; 85];
        buf[0] = 0xff;
        buf[1..21].copy_from_slice(self.as_slice());
        buf[21..53].copy_from_slice(salt.as_slice());
        buf[53..85].copy_from_slice(init_code_hash.as_slice());
        Self::from_word(keccak256(buf))
    }

    /// Computes the `CREATE2` address, hashing the provided init code.
    pub fn create2_from_code(&self, salt: B256, init_code: impl AsRef<[u8]>) -> Self {
        self.create2(salt, keccak256(init_code))
    }
}

impl ops::Deref for Address {
    type Target = [u8; 20];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self::new(bytes)
    }
}

impl From<FixedBytes<20>> for Address {
    fn from(bytes: FixedBytes<20>) -> Self {
        Self(bytes)
    }
}

impl From<Address> for FixedBytes<20> {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl FromStr for Address {
    type Err = const_hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl Encodable for Address {
    fn encode(&self, out: &mut dyn voltic_rlp::BufMut) {
        self.0.encode(out)
    }

    fn length(&self) -> usize {
        self.0.length()
    }
}

impl Decodable for Address {
    fn decode(buf: &mut &[u8]) -> voltic_rlp::Result<Self> {
        FixedBytes::decode(buf).map(Self)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&const_hex::encode_prefixed(self.0 .0))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(any(test, feature = "arbitrary"))]
impl<'a> arbitrary::Arbitrary<'a> for Address {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        FixedBytes::arbitrary(u).map(Self)
    }
}
