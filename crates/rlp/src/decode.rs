use crate::{Error, Header, Result};
use ruint::Uint;

/// A type that can be decoded from RLP.
pub trait Decodable: Sized {
    /// Decodes the value from the start of `buf`, advancing past the
    /// consumed bytes.
    fn decode(buf: &mut &[u8]) -> Result<Self>;
}

/// Decodes a value and requires that the entire input is consumed.
pub fn decode_exact<T: Decodable>(bytes: impl AsRef<[u8]>) -> Result<T> {
    let mut buf = bytes.as_ref();
    let value = T::decode(&mut buf)?;
    if !buf.is_empty() {
        return Err(Error::UnexpectedLength);
    }
    Ok(value)
}

/// Splits the string payload off the front of `buf`.
fn string_payload<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8]> {
    let header = Header::decode(buf)?;
    if header.list {
        return Err(Error::UnexpectedList);
    }
    let (payload, rest) = buf.split_at(header.payload_length);
    *buf = rest;
    Ok(payload)
}

impl Decodable for bool {
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        Ok(match u8::decode(buf)? {
            0 => false,
            1 => true,
            _ => return Err(Error::Custom("invalid bool value, must be 0 or 1")),
        })
    }
}

macro_rules! uint_decodable {
    ($($ty:ty),*) => {$(
        impl Decodable for $ty {
            fn decode(buf: &mut &[u8]) -> Result<Self> {
                let payload = string_payload(buf)?;
                if payload.len() > core::mem::size_of::<$ty>() {
                    return Err(Error::Overflow);
                }
                if payload.first() == Some(&0) {
                    return Err(Error::LeadingZero);
                }
                let mut value: $ty = 0;
                for &byte in payload {
                    value = value.wrapping_shl(8) | byte as $ty;
                }
                Ok(value)
            }
        }
    )*};
}

uint_decodable!(u8, u16, u32, u64, u128, usize);

impl<const BITS: usize, const LIMBS: usize> Decodable for Uint<BITS, LIMBS> {
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        let payload = string_payload(buf)?;
        if payload.first() == Some(&0) {
            return Err(Error::LeadingZero);
        }
        Self::try_from_be_slice(payload).ok_or(Error::Overflow)
    }
}

impl Decodable for bytes::Bytes {
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        string_payload(buf).map(Self::copy_from_slice)
    }
}

impl<const N: usize> Decodable for [u8; N] {
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        let payload = string_payload(buf)?;
        payload.try_into().map_err(|_| Error::UnexpectedLength)
    }
}

impl Decodable for String {
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        let payload = string_payload(buf)?;
        core::str::from_utf8(payload)
            .map(Into::into)
            .map_err(|_| Error::Custom("invalid utf-8 string"))
    }
}

/// Decodes a homogeneous list. Each element must consume exactly its share
/// of the declared payload.
impl<T: Decodable> Decodable for Vec<T> {
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(Error::UnexpectedString);
        }
        let (mut payload, rest) = buf.split_at(header.payload_length);
        *buf = rest;

        let mut values = Self::new();
        while !payload.is_empty() {
            values.push(T::decode(&mut payload)?);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode;
    use hex_literal::hex;

    #[test]
    fn roundtrip_uints() {
        for value in [0u64, 1, 0x7f, 0x80, 0xff, 0x100, u64::MAX] {
            let encoded = encode(value);
            assert_eq!(decode_exact::<u64>(&encoded).unwrap(), value);
        }
    }

    #[test]
    fn decode_string_values() {
        let mut buf = &hex!("83646f67")[..];
        assert_eq!(bytes::Bytes::decode(&mut buf).unwrap(), "dog");
        assert!(buf.is_empty());
    }

    #[test]
    fn rejects_leading_zero_integer() {
        let mut buf = &hex!("820001")[..];
        assert_eq!(u64::decode(&mut buf), Err(Error::LeadingZero));
    }

    #[test]
    fn rejects_overflow() {
        let mut buf = &hex!("830100ff")[..];
        assert_eq!(u16::decode(&mut buf), Err(Error::Overflow));
    }

    #[test]
    fn rejects_trailing_data() {
        let encoded = hex!("0fff");
        assert_eq!(decode_exact::<u64>(encoded), Err(Error::UnexpectedLength));
    }

    #[test]
    fn decode_list_of_strings() {
        // ["cat", "dog"]
        let mut buf = &hex!("c88363617483646f67")[..];
        let decoded = Vec::<String>::decode(&mut buf).unwrap();
        assert_eq!(decoded, ["cat", "dog"]);
    }
}
