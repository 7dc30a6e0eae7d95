use crate::{keccak256, Address, ChainId, B256, U256};
use core::fmt;
use k256::ecdsa::{RecoveryId, VerifyingKey};
use voltic_rlp::{BufMut, Decodable, Encodable};

/// The order `n` of the secp256k1 curve.
pub const SECP256K1N: U256 = U256::from_be_bytes([
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
    0x41, 0x41,
]);

/// Half the order of the secp256k1 curve. Canonical (EIP-2) signatures have
/// `s` at most this value.
pub const SECP256K1N_HALF: U256 = U256::from_be_bytes([
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B,
    0x20, 0xA0,
]);

/// An ECDSA signature over secp256k1 with a recovery parity bit.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    y_parity: bool,
    r: U256,
    s: U256,
}

/// Errors constructing or applying a [`Signature`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// `v` is not a recognized parity encoding.
    #[error("invalid parity value: {0}")]
    InvalidParity(u64),
    /// `r` or `s` is zero or not below the curve order.
    #[error("r and s must be in [1, n-1]")]
    ScalarOutOfRange,
    /// The compact encoding has the wrong length.
    #[error("invalid signature length: expected 65 bytes, got {0}")]
    InvalidLength(usize),
    /// Public-key recovery produced no valid curve point.
    #[error("public key recovery failed")]
    RecoveryFailed,
}

impl Signature {
    /// Instantiates from the scalar components and a parity bit, without
    /// range-checking the scalars.
    pub const fn new_unchecked(r: U256, s: U256, y_parity: bool) -> Self {
        Self { y_parity, r, s }
    }

    /// Instantiates from 32-byte scalars and any recognized `v` encoding
    /// (`0`/`1`, `27`/`28`, or an EIP-155 value).
    ///
    /// Scalars must be in `[1, n-1]`.
    pub fn from_scalars_and_parity(
        r: B256,
        s: B256,
        v: u64,
    ) -> Result<Self, SignatureError> {
        let r = U256::from_be_bytes(r.0);
        let s = U256::from_be_bytes(s.0);
        if r == U256::ZERO || s == U256::ZERO || r >= SECP256K1N || s >= SECP256K1N {
            return Err(SignatureError::ScalarOutOfRange);
        }
        let (y_parity, _) = normalize_v(v)?;
        Ok(Self { y_parity, r, s })
    }

    /// Parses the 65-byte compact encoding `r ‖ s ‖ v`, where `v` is
    /// `0`/`1` or `27`/`28`.
    pub fn from_raw(bytes: &[u8]) -> Result<Self, SignatureError> {
        let bytes: &[u8; 65] =
            bytes.try_into().map_err(|_| SignatureError::InvalidLength(bytes.len()))?;
        Self::from_scalars_and_parity(
            B256::from_slice(&bytes[..32]),
            B256::from_slice(&bytes[32..64]),
            bytes[64] as u64,
        )
    }

    /// The `r` scalar.
    pub const fn r(&self) -> U256 {
        self.r
    }

    /// The `s` scalar.
    pub const fn s(&self) -> U256 {
        self.s
    }

    /// The recovery parity bit.
    pub const fn y_parity(&self) -> bool {
        self.y_parity
    }

    /// The parity as `0` or `1`.
    pub const fn y_parity_byte(&self) -> u8 {
        self.y_parity as u8
    }

    /// The legacy `v` value: `27 + parity` pre-EIP-155, or
    /// `2 * chain_id + 35 + parity` with a chain id.
    pub const fn v(&self, chain_id: Option<ChainId>) -> u64 {
        match chain_id {
            Some(id) => 2 * id + 35 + self.y_parity as u64,
            None => 27 + self.y_parity as u64,
        }
    }

    /// True if `s` is in the lower half of the curve order (EIP-2).
    pub fn is_canonical(&self) -> bool {
        self.s <= SECP256K1N_HALF
    }

    /// Returns the low-s form, flipping the parity bit when `s` is
    /// replaced by `n - s`.
    pub fn normalized(self) -> Self {
        if self.is_canonical() {
            self
        } else {
            Self { y_parity: !self.y_parity, r: self.r, s: SECP256K1N - self.s }
        }
    }

    /// The 65-byte compact encoding `r ‖ s ‖ (27 + parity)`.
    pub fn as_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        bytes[32..64].copy_from_slice(&self.s.to_be_bytes::<32>());
        bytes[64] = 27 + self.y_parity as u8;
        bytes
    }

    /// Recovers the uncompressed public key that produced this signature
    /// over `prehash`.
    pub fn recover_from_prehash(&self, prehash: &B256) -> Result<VerifyingKey, SignatureError> {
        let mut signature = k256::ecdsa::Signature::from_scalars(
            self.r.to_be_bytes::<32>(),
            self.s.to_be_bytes::<32>(),
        )
        .map_err(|_| SignatureError::ScalarOutOfRange)?;

        let mut parity = self.y_parity as u8;
        // the backend only recovers from low-s signatures
        if let Some(normalized) = signature.normalize_s() {
            signature = normalized;
            parity ^= 1;
        }
        let recovery_id =
            RecoveryId::from_byte(parity).ok_or(SignatureError::RecoveryFailed)?;

        VerifyingKey::recover_from_prehash(prehash.as_slice(), &signature, recovery_id)
            .map_err(|_| SignatureError::RecoveryFailed)
    }

    /// Recovers the signer address: the low 20 bytes of the Keccak-256
    /// hash of the uncompressed public key without its `0x04` tag.
    pub fn recover_address_from_prehash(&self, prehash: &B256) -> Result<Address, SignatureError> {
        let key = self.recover_from_prehash(prehash)?;
        let hash = keccak256(&key.to_encoded_point(false).as_bytes()[1..]);
        Ok(Address::from_word(hash))
    }

    /// RLP length of the `r` and `s` fields alone.
    pub fn rlp_rs_len(&self) -> usize {
        self.r.length() + self.s.length()
    }

    /// Encodes `r` then `s`.
    pub fn write_rlp_rs(&self, out: &mut dyn BufMut) {
        self.r.encode(out);
        self.s.encode(out);
    }

    /// RLP length of the typed-transaction signature fields
    /// `[y_parity, r, s]`.
    pub fn rlp_vrs_len(&self) -> usize {
        1 + self.rlp_rs_len()
    }

    /// Encodes the typed-transaction signature fields `y_parity, r, s`.
    pub fn write_rlp_vrs(&self, out: &mut dyn BufMut) {
        self.y_parity.encode(out);
        self.write_rlp_rs(out);
    }

    /// Decodes typed-transaction signature fields `y_parity, r, s`.
    ///
    /// The parity must decode to `0` or `1`.
    pub fn decode_rlp_vrs(buf: &mut &[u8]) -> voltic_rlp::Result<Self> {
        let y_parity = bool::decode(buf)?;
        let r = U256::decode(buf)?;
        let s = U256::decode(buf)?;
        Ok(Self { y_parity, r, s })
    }

    /// Decodes legacy signature fields `v, r, s`, deriving the EIP-155
    /// chain id from `v` when present.
    pub fn decode_rlp_legacy(buf: &mut &[u8]) -> voltic_rlp::Result<(Self, Option<ChainId>)> {
        let v = u64::decode(buf)?;
        let (y_parity, chain_id) =
            normalize_v(v).map_err(|_| voltic_rlp::Error::Custom("invalid v value"))?;
        let r = U256::decode(buf)?;
        let s = U256::decode(buf)?;
        Ok((Self { y_parity, r, s }, chain_id))
    }
}

/// Interprets a `v` value: returns the parity bit and the EIP-155 chain id
/// it embeds, if any.
pub const fn normalize_v(v: u64) -> Result<(bool, Option<ChainId>), SignatureError> {
    match v {
        0 | 1 => Ok((v == 1, None)),
        27 | 28 => Ok((v == 28, None)),
        35.. => Ok(((v - 35) % 2 == 1, Some((v - 35) / 2))),
        _ => Err(SignatureError::InvalidParity(v)),
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("r", &self.r)
            .field("s", &self.s)
            .field("y_parity", &self.y_parity)
            .finish()
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct RpcSignature {
        r: U256,
        s: U256,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y_parity: Option<U256>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        v: Option<U256>,
    }

    impl Serialize for Signature {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            RpcSignature {
                r: self.r,
                s: self.s,
                y_parity: Some(U256::from(self.y_parity as u64)),
                v: None,
            }
            .serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Signature {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let rpc = RpcSignature::deserialize(deserializer)?;
            let v = rpc
                .y_parity
                .or(rpc.v)
                .ok_or_else(|| serde::de::Error::custom("missing yParity or v"))?;
            let v = u64::try_from(v).map_err(serde::de::Error::custom)?;
            let (y_parity, _) = normalize_v(v).map_err(serde::de::Error::custom)?;
            Ok(Self { y_parity, r: rpc.r, s: rpc.s })
        }
    }
}

#[cfg(any(test, feature = "arbitrary"))]
impl<'a> arbitrary::Arbitrary<'a> for Signature {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let r = U256::from_be_bytes(<[u8; 32]>::arbitrary(u)?);
        let s = U256::from_be_bytes(<[u8; 32]>::arbitrary(u)?);
        Ok(Self {
            y_parity: bool::arbitrary(u)?,
            r: r % SECP256K1N,
            s: s % SECP256K1N_HALF,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::b256;

    fn sample() -> Signature {
        Signature::from_scalars_and_parity(
            b256!("840cfc572845f5786e702984c2a582528cad4b49b2a10b9db1be7fca90058565"),
            b256!("25e7109ceb98168d95b09b18bbf6b685130e0562f233877d492b94eee0c5b6d1"),
            0,
        )
        .unwrap()
    }

    #[test]
    fn compact_roundtrip() {
        let signature = sample();
        let bytes = signature.as_bytes();
        assert_eq!(bytes[64], 27);
        assert_eq!(Signature::from_raw(&bytes).unwrap(), signature);
    }

    #[test]
    fn v_encodings() {
        let signature = sample();
        assert_eq!(signature.v(None), 27);
        assert_eq!(signature.v(Some(1)), 37);
        assert_eq!(normalize_v(37).unwrap(), (false, Some(1)));
        assert_eq!(normalize_v(38).unwrap(), (true, Some(1)));
        assert_eq!(normalize_v(28).unwrap(), (true, None));
        assert!(normalize_v(29).is_err());
    }

    #[test]
    fn normalization_is_involutive_on_canonical() {
        let signature = sample();
        assert!(signature.is_canonical());
        assert_eq!(signature.normalized(), signature);
    }

    #[test]
    fn normalizes_high_s() {
        let signature = sample();
        let high = Signature::new_unchecked(
            signature.r(),
            SECP256K1N - signature.s(),
            !signature.y_parity(),
        );
        assert!(!high.is_canonical());
        assert_eq!(high.normalized(), signature);
    }

    #[test]
    fn rejects_zero_scalars() {
        assert_eq!(
            Signature::from_scalars_and_parity(B256::ZERO, B256::ZERO, 0),
            Err(SignatureError::ScalarOutOfRange)
        );
    }

    #[test]
    fn rlp_vrs_roundtrip() {
        let signature = sample();
        let mut buf = Vec::new();
        signature.write_rlp_vrs(&mut buf);
        assert_eq!(buf.len(), signature.rlp_vrs_len());
        let decoded = Signature::decode_rlp_vrs(&mut &buf[..]).unwrap();
        assert_eq!(decoded, signature);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn rpc_roundtrip() {
        let signature = sample();
        let json = serde_json::to_string(&signature).unwrap();
        let back: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, signature);
    }
}
