use crate::{Header, EMPTY_STRING_CODE, MAX_SHORT_PAYLOAD};
use bytes::BufMut;
use ruint::Uint;

/// A type that can be encoded as RLP.
pub trait Encodable {
    /// Encodes the value into `out`.
    fn encode(&self, out: &mut dyn BufMut);

    /// The length of the encoding in bytes, including any header.
    fn length(&self) -> usize {
        let mut out = Vec::new();
        self.encode(&mut out);
        out.len()
    }
}

/// The number of header bytes needed for a payload of `payload_length`.
pub const fn length_of_length(payload_length: usize) -> usize {
    if payload_length <= MAX_SHORT_PAYLOAD {
        1
    } else {
        1 + (usize::BITS as usize / 8) - (payload_length.leading_zeros() as usize / 8)
    }
}

/// Encodes a value into a fresh vector.
pub fn encode<T: Encodable>(value: T) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.length());
    value.encode(&mut out);
    out
}

/// Encodes a slice of encodable values as an RLP list.
pub fn encode_list<T: Encodable>(values: &[T], out: &mut dyn BufMut) {
    let payload_length = values.iter().map(Encodable::length).sum();
    Header { list: true, payload_length }.encode(out);
    for value in values {
        value.encode(out);
    }
}

/// The full encoded length of an RLP list with the given items.
pub fn list_length<T: Encodable>(values: &[T]) -> usize {
    let payload_length: usize = values.iter().map(Encodable::length).sum();
    length_of_length(payload_length) + payload_length
}

fn encode_bytes(bytes: &[u8], out: &mut dyn BufMut) {
    match bytes {
        [byte] if *byte < EMPTY_STRING_CODE => out.put_u8(*byte),
        _ => {
            Header { list: false, payload_length: bytes.len() }.encode(out);
            out.put_slice(bytes);
        }
    }
}

fn bytes_length(bytes: &[u8]) -> usize {
    match bytes {
        [byte] if *byte < EMPTY_STRING_CODE => 1,
        _ => length_of_length(bytes.len()) + bytes.len(),
    }
}

impl Encodable for [u8] {
    fn encode(&self, out: &mut dyn BufMut) {
        encode_bytes(self, out);
    }

    fn length(&self) -> usize {
        bytes_length(self)
    }
}

impl<const N: usize> Encodable for [u8; N] {
    fn encode(&self, out: &mut dyn BufMut) {
        encode_bytes(self, out);
    }

    fn length(&self) -> usize {
        bytes_length(self)
    }
}

impl Encodable for str {
    fn encode(&self, out: &mut dyn BufMut) {
        encode_bytes(self.as_bytes(), out);
    }

    fn length(&self) -> usize {
        bytes_length(self.as_bytes())
    }
}

impl Encodable for String {
    fn encode(&self, out: &mut dyn BufMut) {
        self.as_str().encode(out);
    }

    fn length(&self) -> usize {
        self.as_str().length()
    }
}

impl Encodable for bool {
    fn encode(&self, out: &mut dyn BufMut) {
        // true is 0x01, false is the empty string
        out.put_u8(if *self { 1 } else { EMPTY_STRING_CODE });
    }

    fn length(&self) -> usize {
        1
    }
}

macro_rules! uint_encodable {
    ($($ty:ty),*) => {$(
        impl Encodable for $ty {
            fn encode(&self, out: &mut dyn BufMut) {
                let bytes = self.to_be_bytes();
                let zeros = bytes.iter().take_while(|b| **b == 0).count();
                encode_bytes(&bytes[zeros..], out);
            }

            fn length(&self) -> usize {
                if *self < EMPTY_STRING_CODE as $ty {
                    1
                } else {
                    let bits = <$ty>::BITS as usize - self.leading_zeros() as usize;
                    1 + bits.div_ceil(8)
                }
            }
        }
    )*};
}

uint_encodable!(u8, u16, u32, u64, u128, usize);

impl<const BITS: usize, const LIMBS: usize> Encodable for Uint<BITS, LIMBS> {
    fn encode(&self, out: &mut dyn BufMut) {
        let bytes = self.to_be_bytes_vec();
        let zeros = bytes.iter().take_while(|b| **b == 0).count();
        encode_bytes(&bytes[zeros..], out);
    }

    fn length(&self) -> usize {
        let bits = self.bit_len();
        if bits <= 7 {
            1
        } else {
            1 + bits.div_ceil(8)
        }
    }
}

impl<T: Encodable> Encodable for Vec<T> {
    fn encode(&self, out: &mut dyn BufMut) {
        encode_list(self, out);
    }

    fn length(&self) -> usize {
        list_length(self)
    }
}

impl<T: Encodable + ?Sized> Encodable for &T {
    fn encode(&self, out: &mut dyn BufMut) {
        (**self).encode(out);
    }

    fn length(&self) -> usize {
        (**self).length()
    }
}

impl Encodable for bytes::Bytes {
    fn encode(&self, out: &mut dyn BufMut) {
        encode_bytes(self, out);
    }

    fn length(&self) -> usize {
        bytes_length(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn encode_strings() {
        assert_eq!(encode("dog"), hex!("83646f67"));
        assert_eq!(encode(""), [EMPTY_STRING_CODE]);
        assert_eq!(encode([0x00u8].as_slice()), [0x00]);
        assert_eq!(encode([0x7fu8].as_slice()), [0x7f]);
        assert_eq!(encode([0x80u8].as_slice()), [0x81, 0x80]);
    }

    #[test]
    fn encode_longer_string() {
        let encoded = encode("Lorem ipsum dolor sit amet, consectetur adipisicing elit");
        assert_eq!(encoded[..2], hex!("b838"));
        assert_eq!(encoded.len(), 2 + 56);
    }

    #[test]
    fn encode_uints() {
        assert_eq!(encode(0u64), [EMPTY_STRING_CODE]);
        assert_eq!(encode(15u64), [0x0f]);
        assert_eq!(encode(1024u64), hex!("820400"));
        assert_eq!(encode(0xffccb5u64), hex!("83ffccb5"));
        assert_eq!(0xffccb5u64.length(), 4);
    }

    #[test]
    fn encode_nested_lists() {
        // [ [], [[]], [ [], [[]] ] ]
        let mut out = Vec::new();
        let empty: Vec<Vec<Vec<u8>>> = vec![];
        let one: Vec<Vec<Vec<u8>>> = vec![vec![]];
        let both = vec![empty.clone(), one.clone()];
        crate::Header { list: true, payload_length: empty.length() + one.length() + both.length() }
            .encode(&mut out);
        empty.encode(&mut out);
        one.encode(&mut out);
        both.encode(&mut out);
        assert_eq!(out, hex!("c7c0c1c0c3c0c1c0"));
    }
}
