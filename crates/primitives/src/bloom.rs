use crate::{keccak256, Address, FixedBytes, Log, B256};
use core::fmt;
use voltic_rlp::{Decodable, Encodable};

/// Size of the Ethereum log bloom in bytes.
pub const BLOOM_SIZE_BYTES: usize = 256;

/// Size of the Ethereum log bloom in bits.
pub const BLOOM_SIZE_BITS: usize = BLOOM_SIZE_BYTES * 8;

/// Number of bits set per inserted item.
pub const BLOOM_BITS_PER_ITEM: usize = 3;

/// The 2048-bit probabilistic log index used by receipts and block
/// headers.
///
/// Each inserted item sets three bits derived from its Keccak-256 hash.
/// A clear bit proves absence; a set bit is only probabilistic evidence of
/// presence. [`Bloom::accrue`] mutates in place, the only in-place
/// mutation in this crate; [`Bloom::with`] is the copying form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Bloom(pub FixedBytes<BLOOM_SIZE_BYTES>);

/// Input to a bloom filter: raw bytes (hashed on insertion) or an
/// already-computed Keccak-256 hash.
#[derive(Clone, Copy, Debug)]
pub enum BloomInput<'a> {
    /// Arbitrary bytes, hashed with Keccak-256 before bit selection.
    Raw(&'a [u8]),
    /// A precomputed Keccak-256 hash.
    Hash(&'a B256),
}

impl BloomInput<'_> {
    /// The hash the bit indices are read from.
    pub fn into_hash(self) -> B256 {
        match self {
            BloomInput::Raw(raw) => keccak256(raw),
            BloomInput::Hash(hash) => *hash,
        }
    }
}

impl From<BloomInput<'_>> for Bloom {
    fn from(input: BloomInput<'_>) -> Self {
        let mut bloom = Self::ZERO;
        bloom.accrue(input);
        bloom
    }
}

impl Bloom {
    /// The empty bloom.
    pub const ZERO: Self = Self(FixedBytes::ZERO);

    /// Wraps the given 256-byte array.
    pub const fn new(bytes: [u8; BLOOM_SIZE_BYTES]) -> Self {
        Self(FixedBytes(bytes))
    }

    /// Borrows the filter bytes.
    pub const fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// True if no bit is set.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Sets the three bits selected by `input`. This is the `m3:2048`
    /// scheme: three 11-bit big-endian windows of the input's hash.
    pub fn accrue(&mut self, input: BloomInput<'_>) {
        let hash = input.into_hash();
        for i in [0usize, 2, 4] {
            let bit = (hash[i + 1] as usize + ((hash[i] as usize) << 8)) % BLOOM_SIZE_BITS;
            let byte = BLOOM_SIZE_BYTES - 1 - bit / 8;
            self.0 .0[byte] |= 1 << (bit % 8);
        }
    }

    /// Unions another bloom into this one.
    pub fn accrue_bloom(&mut self, other: &Self) {
        self.0 |= other.0;
    }

    /// Sets the bits for a log's address and every topic.
    pub fn accrue_log(&mut self, log: &Log) {
        self.accrue(BloomInput::Raw(log.address.as_slice()));
        for topic in log.topics() {
            self.accrue(BloomInput::Raw(topic.as_slice()));
        }
    }

    /// Pure form of [`Self::accrue`]: returns a copy with `input` added.
    #[must_use]
    pub fn with(mut self, input: BloomInput<'_>) -> Self {
        self.accrue(input);
        self
    }

    /// True if all three bits selected by `input` are set.
    ///
    /// A `false` result proves the input was never added; `true` may be a
    /// false positive.
    pub fn contains_input(&self, input: BloomInput<'_>) -> bool {
        self.contains_bloom(&Self::from(input))
    }

    /// True if every bit set in `other` is also set in `self`.
    pub fn contains_bloom(&self, other: &Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// The union of two blooms.
    #[must_use]
    pub fn merged(mut self, other: &Self) -> Self {
        self.accrue_bloom(other);
        self
    }

    /// The fraction of set bits, in `[0, 1]`.
    pub fn density(&self) -> f64 {
        self.0.count_ones() as f64 / BLOOM_SIZE_BITS as f64
    }

    /// The expected false-positive probability after `items` distinct
    /// insertions: `(1 - e^(-k·n/m))^k` with `k = 3`, `m = 2048`.
    pub fn expected_false_positive_rate(items: usize) -> f64 {
        let exponent = -(BLOOM_BITS_PER_ITEM as f64 * items as f64) / BLOOM_SIZE_BITS as f64;
        (1.0 - exponent.exp()).powi(BLOOM_BITS_PER_ITEM as i32)
    }

    /// The bloom of a single log (address plus topics).
    pub fn from_log(log: &Log) -> Self {
        let mut bloom = Self::ZERO;
        bloom.accrue_log(log);
        bloom
    }

    /// True if the filter would admit a log from `address`.
    pub fn contains_address(&self, address: Address) -> bool {
        self.contains_input(BloomInput::Raw(address.as_slice()))
    }
}

impl<'a> FromIterator<&'a Log> for Bloom {
    fn from_iter<T: IntoIterator<Item = &'a Log>>(logs: T) -> Self {
        let mut bloom = Self::ZERO;
        for log in logs {
            bloom.accrue_log(log);
        }
        bloom
    }
}

impl<'a> FromIterator<&'a Bloom> for Bloom {
    fn from_iter<T: IntoIterator<Item = &'a Bloom>>(blooms: T) -> Self {
        let mut bloom = Self::ZERO;
        for other in blooms {
            bloom.accrue_bloom(other);
        }
        bloom
    }
}

impl fmt::Display for Bloom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for Bloom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl core::str::FromStr for Bloom {
    type Err = const_hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<[u8; BLOOM_SIZE_BYTES]> for Bloom {
    fn from(bytes: [u8; BLOOM_SIZE_BYTES]) -> Self {
        Self::new(bytes)
    }
}

impl Encodable for Bloom {
    fn encode(&self, out: &mut dyn voltic_rlp::BufMut) {
        self.0.encode(out)
    }

    fn length(&self) -> usize {
        self.0.length()
    }
}

impl Decodable for Bloom {
    fn decode(buf: &mut &[u8]) -> voltic_rlp::Result<Self> {
        FixedBytes::decode(buf).map(Self)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Bloom {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Bloom {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        FixedBytes::deserialize(deserializer).map(Self)
    }
}
