//! [EIP-2718] typed-envelope traits.
//!
//! An envelope wraps a transaction or receipt with a leading type flag in
//! the range `0x00..=0x7f`; a leading byte of `0xc0` or above is an
//! untyped (legacy) RLP list.
//!
//! [EIP-2718]: https://eips.ethereum.org/EIPS/eip-2718

use voltic_primitives::{keccak256, B256};
use voltic_rlp::{BufMut, Header, EMPTY_STRING_CODE};

// type flags only go up to 0x7f
const TX_TYPE_BYTE_MAX: u8 = 0x7f;

/// [EIP-2718] decoding errors.
///
/// [EIP-2718]: https://eips.ethereum.org/EIPS/eip-2718
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Eip2718Error {
    /// The inner RLP payload was malformed.
    #[error(transparent)]
    RlpError(#[from] voltic_rlp::Error),
    /// The leading type flag is not a known envelope type.
    #[error("unexpected transaction type flag: {0}")]
    UnexpectedType(u8),
}

/// Decoding trait for [EIP-2718] envelopes.
///
/// [EIP-2718]: https://eips.ethereum.org/EIPS/eip-2718
pub trait Decodable2718: Sized {
    /// Extracts the type byte from the buffer, if any. The type byte is
    /// the first byte, provided it is `0x7f` or lower.
    fn extract_type_byte(buf: &[u8]) -> Option<u8> {
        buf.first().copied().filter(|b| *b <= TX_TYPE_BYTE_MAX)
    }

    /// Decodes the variant selected by `ty` from the payload after the
    /// type byte.
    fn typed_decode(ty: u8, buf: &mut &[u8]) -> Result<Self, Eip2718Error>;

    /// Decodes the untyped (legacy) variant.
    fn fallback_decode(buf: &mut &[u8]) -> Result<Self, Eip2718Error>;

    /// Decodes a raw EIP-2718 envelope: `type_byte ++ payload`, or a bare
    /// legacy list.
    fn decode_2718(buf: &mut &[u8]) -> Result<Self, Eip2718Error> {
        match Self::extract_type_byte(buf) {
            Some(ty) => {
                *buf = &buf[1..];
                Self::typed_decode(ty, buf)
            }
            None => Self::fallback_decode(buf),
        }
    }

    /// Decodes the network format: for typed envelopes the 2718 encoding
    /// is wrapped in an RLP string; legacy envelopes are bare lists.
    fn network_decode(buf: &mut &[u8]) -> Result<Self, Eip2718Error> {
        let mut h_decode = *buf;
        let header = Header::decode(&mut h_decode)?;

        if header.list {
            return Self::fallback_decode(buf);
        }
        *buf = h_decode;

        let remaining = buf.len();
        if remaining == 0 || remaining < header.payload_length {
            return Err(voltic_rlp::Error::InputTooShort.into());
        }

        let ty = buf[0];
        *buf = &buf[1..];
        let value = Self::typed_decode(ty, buf)?;

        // a single-byte type would itself parse as a one-byte string
        // header, so only check consumption for string-wrapped payloads
        let consumed = remaining - buf.len();
        if consumed != header.payload_length && h_decode[0] > EMPTY_STRING_CODE {
            return Err(voltic_rlp::Error::UnexpectedLength.into());
        }

        Ok(value)
    }
}

/// Encoding trait for [EIP-2718] envelopes.
///
/// [EIP-2718]: https://eips.ethereum.org/EIPS/eip-2718
pub trait Encodable2718: Sized {
    /// The type flag, or `None` for the legacy variant.
    fn type_flag(&self) -> Option<u8>;

    /// True for the legacy variant.
    fn is_legacy(&self) -> bool {
        matches!(self.type_flag(), None | Some(0))
    }

    /// The length of the 2718 encoding: type flag plus inner payload.
    fn encode_2718_len(&self) -> usize;

    /// Encodes the envelope: a type flag in `0x00..=0x7f` (absent for
    /// legacy), then the RLP transaction body.
    fn encode_2718(&self, out: &mut dyn BufMut);

    /// Convenience: the 2718 encoding in a fresh vector.
    fn encoded_2718(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encode_2718_len());
        self.encode_2718(&mut out);
        out
    }

    /// The hash committed to in the transaction trie: the Keccak-256 hash
    /// of the 2718 encoding.
    fn trie_hash(&self) -> B256 {
        keccak256(self.encoded_2718())
    }

    /// Encodes in the network format: typed payloads are wrapped in an
    /// RLP string, legacy payloads are emitted as-is.
    fn network_encode(&self, out: &mut dyn BufMut) {
        if !self.is_legacy() {
            Header { list: false, payload_length: self.encode_2718_len() }.encode(out);
        }
        self.encode_2718(out);
    }

    /// The length of the network encoding.
    fn network_len(&self) -> usize {
        let payload_length = self.encode_2718_len();
        if self.is_legacy() {
            payload_length
        } else {
            Header { list: false, payload_length }.length() + payload_length
        }
    }
}

/// A type with a stable [EIP-2718] type identifier.
///
/// [EIP-2718]: https://eips.ethereum.org/EIPS/eip-2718
pub trait Typed2718 {
    /// The type flag as a byte (0 for legacy).
    fn ty(&self) -> u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain(Vec<u8>);

    impl Encodable2718 for Plain {
        fn type_flag(&self) -> Option<u8> {
            Some(0x02)
        }

        fn encode_2718_len(&self) -> usize {
            1 + self.0.len()
        }

        fn encode_2718(&self, out: &mut dyn BufMut) {
            out.put_u8(0x02);
            out.put_slice(&self.0);
        }
    }

    #[test]
    fn network_encoding_wraps_typed_payloads() {
        let value = Plain(vec![0xc0]);
        let mut out = Vec::new();
        value.network_encode(&mut out);
        // string header wrapping [type, payload...]
        assert_eq!(out, [0x82, 0x02, 0xc0]);
        assert_eq!(out.len(), value.network_len());
    }

    #[test]
    fn type_byte_extraction() {
        struct Probe;
        impl Decodable2718 for Probe {
            fn typed_decode(_: u8, _: &mut &[u8]) -> Result<Self, Eip2718Error> {
                Ok(Self)
            }
            fn fallback_decode(_: &mut &[u8]) -> Result<Self, Eip2718Error> {
                Ok(Self)
            }
        }

        assert_eq!(Probe::extract_type_byte(&[0x01]), Some(0x01));
        assert_eq!(Probe::extract_type_byte(&[0x7f]), Some(0x7f));
        assert_eq!(Probe::extract_type_byte(&[0x80]), None);
        assert_eq!(Probe::extract_type_byte(&[0xc0]), None);
    }
}
