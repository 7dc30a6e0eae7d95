use crate::Address;
use voltic_rlp::{Decodable, Encodable, EMPTY_STRING_CODE};

/// The destination of a transaction: a call to an address, or contract
/// creation.
///
/// RLP-encodes as the 20-byte address or, for creation, the empty string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum TxKind {
    /// Contract creation.
    #[default]
    Create,
    /// A call to the given address.
    Call(Address),
}

impl TxKind {
    /// The target address, or `None` for creation.
    pub const fn to(&self) -> Option<&Address> {
        match self {
            Self::Create => None,
            Self::Call(to) => Some(to),
        }
    }

    /// True if this is a contract creation.
    pub const fn is_create(&self) -> bool {
        matches!(self, Self::Create)
    }

    /// True if this is a call.
    pub const fn is_call(&self) -> bool {
        matches!(self, Self::Call(_))
    }
}

impl From<Address> for TxKind {
    fn from(address: Address) -> Self {
        Self::Call(address)
    }
}

impl From<Option<Address>> for TxKind {
    fn from(address: Option<Address>) -> Self {
        address.map_or(Self::Create, Self::Call)
    }
}

impl From<TxKind> for Option<Address> {
    fn from(kind: TxKind) -> Self {
        kind.to().copied()
    }
}

impl Encodable for TxKind {
    fn encode(&self, out: &mut dyn voltic_rlp::BufMut) {
        match self {
            Self::Create => out.put_u8(EMPTY_STRING_CODE),
            Self::Call(to) => to.encode(out),
        }
    }

    fn length(&self) -> usize {
        match self {
            Self::Create => 1,
            Self::Call(to) => to.length(),
        }
    }
}

impl Decodable for TxKind {
    fn decode(buf: &mut &[u8]) -> voltic_rlp::Result<Self> {
        match buf.first() {
            Some(&EMPTY_STRING_CODE) => {
                *buf = &buf[1..];
                Ok(Self::Create)
            }
            Some(_) => Address::decode(buf).map(Self::Call),
            None => Err(voltic_rlp::Error::InputTooShort),
        }
    }
}

#[cfg(any(test, feature = "arbitrary"))]
impl<'a> arbitrary::Arbitrary<'a> for TxKind {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Option::<Address>::arbitrary(u)?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address;

    #[test]
    fn rlp_create_is_empty_string() {
        assert_eq!(voltic_rlp::encode(TxKind::Create), [EMPTY_STRING_CODE]);
        assert_eq!(
            voltic_rlp::decode_exact::<TxKind>([EMPTY_STRING_CODE]).unwrap(),
            TxKind::Create
        );
    }

    #[test]
    fn rlp_call_roundtrip() {
        let kind = TxKind::Call(address!("3535353535353535353535353535353535353535"));
        let encoded = voltic_rlp::encode(kind);
        assert_eq!(encoded.len(), 21);
        assert_eq!(voltic_rlp::decode_exact::<TxKind>(&encoded).unwrap(), kind);
    }
}
