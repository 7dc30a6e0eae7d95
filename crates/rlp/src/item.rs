use crate::{Error, Header, Result, EMPTY_STRING_CODE};
use bytes::BufMut;

/// An untyped RLP value: a byte string or an ordered list of values.
///
/// [`Item::decode`] is lenient: non-canonical integer and length
/// encodings are accepted, matching what most historical chain data
/// tooling tolerates. [`Item::decode_strict`] rejects them, and
/// [`is_canonical`] reports whether an encoding is in canonical form
/// without constructing the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    /// A byte string.
    String(Vec<u8>),
    /// A list of items.
    List(Vec<Item>),
}

impl Item {
    /// Decodes an item from the front of `bytes`, leniently.
    ///
    /// Returns the item and the number of bytes consumed so callers can
    /// check for trailing data.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize)> {
        decode_item(bytes, false)
    }

    /// Decodes an item, rejecting non-canonical encodings.
    pub fn decode_strict(bytes: &[u8]) -> Result<(Self, usize)> {
        decode_item(bytes, true)
    }

    /// Decodes an item and requires the input to be fully consumed.
    pub fn decode_exact(bytes: &[u8]) -> Result<Self> {
        let (item, consumed) = Self::decode(bytes)?;
        if consumed != bytes.len() {
            return Err(Error::UnexpectedLength);
        }
        Ok(item)
    }

    /// Encodes the item into `out`.
    pub fn encode(&self, out: &mut dyn BufMut) {
        match self {
            Self::String(bytes) => crate::Encodable::encode(bytes.as_slice(), out),
            Self::List(items) => {
                let payload_length = items.iter().map(Self::encoded_length).sum();
                Header { list: true, payload_length }.encode(out);
                for item in items {
                    item.encode(out);
                }
            }
        }
    }

    /// The number of bytes the canonical encoding of this item occupies.
    pub fn encoded_length(&self) -> usize {
        match self {
            Self::String(bytes) => match bytes.as_slice() {
                [byte] if *byte < EMPTY_STRING_CODE => 1,
                _ => crate::length_of_length(bytes.len()) + bytes.len(),
            },
            Self::List(items) => {
                let payload_length: usize = items.iter().map(Self::encoded_length).sum();
                crate::length_of_length(payload_length) + payload_length
            }
        }
    }

    /// Encodes the item into a fresh vector.
    pub fn encoded(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_length());
        self.encode(&mut out);
        out
    }

    /// Returns the byte string, or `None` for a list.
    pub fn as_string(&self) -> Option<&[u8]> {
        match self {
            Self::String(bytes) => Some(bytes),
            Self::List(_) => None,
        }
    }

    /// Returns the list items, or `None` for a string.
    pub fn as_list(&self) -> Option<&[Item]> {
        match self {
            Self::String(_) => None,
            Self::List(items) => Some(items),
        }
    }
}

/// Whether `bytes` is a single canonically-encoded item.
///
/// True iff the strict decoder accepts the input with no trailing data and
/// re-encoding reproduces it byte-for-byte.
pub fn is_canonical(bytes: &[u8]) -> bool {
    match Item::decode_strict(bytes) {
        Ok((item, consumed)) => consumed == bytes.len() && item.encoded() == bytes,
        Err(_) => false,
    }
}

fn decode_item(bytes: &[u8], strict: bool) -> Result<(Item, usize)> {
    let (header, header_len) = Header::decode_raw(bytes, strict)?;

    // single byte: the byte is its own encoding
    if header_len == 0 {
        return Ok((Item::String(vec![bytes[0]]), 1));
    }

    let payload = bytes
        .get(header_len..header_len + header.payload_length)
        .ok_or(Error::InputTooShort)?;

    let item = if header.list {
        let mut items = Vec::new();
        let mut offset = 0;
        while offset < payload.len() {
            let (child, consumed) = decode_item(&payload[offset..], strict)?;
            items.push(child);
            offset += consumed;
        }
        Item::List(items)
    } else {
        Item::String(payload.to_vec())
    };

    Ok((item, header_len + header.payload_length))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn decode_dog() {
        let (item, consumed) = Item::decode(&hex!("83646f67")).unwrap();
        assert_eq!(item, Item::String(b"dog".to_vec()));
        assert_eq!(consumed, 4);
    }

    #[test]
    fn decode_set_theoretic_representation_of_three() {
        // [ [], [[]], [ [], [[]] ] ]
        let encoded = hex!("c7c0c1c0c3c0c1c0");
        let (item, consumed) = Item::decode(&encoded).unwrap();
        assert_eq!(consumed, 8);

        let empty = Item::List(vec![]);
        let one = Item::List(vec![empty.clone()]);
        let expected =
            Item::List(vec![empty.clone(), one.clone(), Item::List(vec![empty, one])]);
        assert_eq!(item, expected);
        assert_eq!(item.encoded(), encoded);
    }

    #[test]
    fn lenient_accepts_wrapped_low_byte() {
        // 0x81 0x04 wraps a byte that should be bare
        let (item, consumed) = Item::decode(&hex!("8104")).unwrap();
        assert_eq!(item, Item::String(vec![0x04]));
        assert_eq!(consumed, 2);

        assert!(Item::decode_strict(&hex!("8104")).is_err());
        assert!(!is_canonical(&hex!("8104")));
    }

    #[test]
    fn canonical_checks() {
        assert!(is_canonical(&hex!("c0")));
        assert!(is_canonical(&hex!("83646f67")));
        assert!(is_canonical(&[0x04]));
        // trailing data is not a single item
        assert!(!is_canonical(&hex!("c0c0")));
        // non-canonical long length
        assert!(!is_canonical(&hex!("b80464617461")));
    }

    #[test]
    fn reports_trailing_bytes() {
        let input = hex!("83646f67ff");
        let (_, consumed) = Item::decode(&input).unwrap();
        assert_eq!(consumed, 4);
        assert!(Item::decode_exact(&input).is_err());
    }

    #[test]
    fn truncated_input_fails() {
        assert_eq!(Item::decode(&hex!("83646f")), Err(Error::InputTooShort));
        assert_eq!(Item::decode(&hex!("f9")), Err(Error::InputTooShort));
    }
}
