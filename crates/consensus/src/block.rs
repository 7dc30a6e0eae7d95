use crate::{Header, TxEnvelope, Withdrawal};
use voltic_rlp::{BufMut, Decodable, Encodable, Header as RlpHeader};

/// The transactions, ommers, and (post-Shanghai) withdrawals of a block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BlockBody<T = TxEnvelope> {
    /// The block's transactions.
    pub transactions: Vec<T>,
    /// The headers of the block's ommers; empty post-merge.
    pub ommers: Vec<Header>,
    /// The block's withdrawals, from Shanghai on.
    pub withdrawals: Option<Vec<Withdrawal>>,
}

/// A complete block: header plus body.
///
/// RLP-encodes as `[header, transactions, ommers, (withdrawals)]`, with
/// the withdrawals list present exactly when the body carries one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Block<T = TxEnvelope> {
    /// The block header.
    pub header: Header,
    /// The block body.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub body: BlockBody<T>,
}

impl<T> Block<T> {
    /// Assembles a block from parts.
    pub const fn new(header: Header, body: BlockBody<T>) -> Self {
        Self { header, body }
    }
}

impl<T: Encodable> Block<T> {
    fn rlp_payload_length(&self) -> usize {
        let mut length = self.header.length()
            + self.body.transactions.length()
            + self.body.ommers.length();
        if let Some(withdrawals) = &self.body.withdrawals {
            length += withdrawals.length();
        }
        length
    }
}

impl<T: Encodable> Encodable for Block<T> {
    fn encode(&self, out: &mut dyn BufMut) {
        RlpHeader { list: true, payload_length: self.rlp_payload_length() }.encode(out);
        self.header.encode(out);
        self.body.transactions.encode(out);
        self.body.ommers.encode(out);
        if let Some(withdrawals) = &self.body.withdrawals {
            withdrawals.encode(out);
        }
    }

    fn length(&self) -> usize {
        let payload_length = self.rlp_payload_length();
        voltic_rlp::length_of_length(payload_length) + payload_length
    }
}

impl<T: Decodable> Decodable for Block<T> {
    fn decode(buf: &mut &[u8]) -> voltic_rlp::Result<Self> {
        let rlp_header = RlpHeader::decode(buf)?;
        if !rlp_header.list {
            return Err(voltic_rlp::Error::UnexpectedString);
        }
        let started = buf.len();

        let header = Header::decode(buf)?;
        let transactions = Vec::<T>::decode(buf)?;
        let ommers = Vec::<Header>::decode(buf)?;

        let mut withdrawals = None;
        if started - buf.len() < rlp_header.payload_length {
            withdrawals = Some(Vec::<Withdrawal>::decode(buf)?);
        }

        if started - buf.len() != rlp_header.payload_length {
            return Err(voltic_rlp::Error::ListLengthMismatch {
                expected: rlp_header.payload_length,
                got: started - buf.len(),
            });
        }

        Ok(Self { header, body: BlockBody { transactions, ommers, withdrawals } })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{sign_transaction, TxEip1559};
    use voltic_eips::eip2930::AccessList;
    use voltic_primitives::{address, b256, Bytes, TxKind, U256};

    fn sample_block() -> Block {
        let tx = TxEip1559 {
            chain_id: 1,
            nonce: 1,
            max_priority_fee_per_gas: 1_000_000_000,
            max_fee_per_gas: 30_000_000_000,
            gas_limit: 21_000,
            to: TxKind::Call(address!("3535353535353535353535353535353535353535")),
            value: U256::from(1u64),
            access_list: AccessList::default(),
            input: Bytes::new(),
        };
        let secret =
            b256!("4646464646464646464646464646464646464646464646464646464646464646");
        let envelope = sign_transaction(tx, &secret).unwrap().into();

        Block {
            header: Header {
                number: 1,
                gas_limit: 30_000_000,
                base_fee_per_gas: Some(7),
                ..Default::default()
            },
            body: BlockBody {
                transactions: vec![envelope],
                ommers: Vec::new(),
                withdrawals: Some(vec![Withdrawal::default()]),
            },
        }
    }

    #[test]
    fn rlp_roundtrip() {
        let block = sample_block();
        let encoded = voltic_rlp::encode(&block);
        assert_eq!(voltic_rlp::decode_exact::<Block>(&encoded).unwrap(), block);
    }

    #[test]
    fn rlp_roundtrip_without_withdrawals() {
        let mut block = sample_block();
        block.body.withdrawals = None;
        let encoded = voltic_rlp::encode(&block);
        assert_eq!(voltic_rlp::decode_exact::<Block>(&encoded).unwrap(), block);
    }
}
