use voltic_primitives::Address;
use voltic_rlp::{BufMut, Decodable, Encodable, Header};

/// A validator withdrawal pushed into the execution layer
/// ([EIP-4895](https://eips.ethereum.org/EIPS/eip-4895)).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Withdrawal {
    /// Monotonically increasing withdrawal index.
    pub index: u64,
    /// Index of the withdrawing validator.
    pub validator_index: u64,
    /// The recipient of the withdrawn ether.
    pub address: Address,
    /// The withdrawn amount, in gwei.
    pub amount: u64,
}

impl Withdrawal {
    fn rlp_payload_length(&self) -> usize {
        self.index.length()
            + self.validator_index.length()
            + self.address.length()
            + self.amount.length()
    }
}

impl Encodable for Withdrawal {
    fn encode(&self, out: &mut dyn BufMut) {
        Header { list: true, payload_length: self.rlp_payload_length() }.encode(out);
        self.index.encode(out);
        self.validator_index.encode(out);
        self.address.encode(out);
        self.amount.encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.rlp_payload_length();
        voltic_rlp::length_of_length(payload_length) + payload_length
    }
}

impl Decodable for Withdrawal {
    fn decode(buf: &mut &[u8]) -> voltic_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(voltic_rlp::Error::UnexpectedString);
        }
        Ok(Self {
            index: Decodable::decode(buf)?,
            validator_index: Decodable::decode(buf)?,
            address: Decodable::decode(buf)?,
            amount: Decodable::decode(buf)?,
        })
    }
}
