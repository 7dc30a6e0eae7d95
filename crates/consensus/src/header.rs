use crate::constants::{EMPTY_OMMER_ROOT_HASH, EMPTY_ROOT_HASH};
use voltic_primitives::{keccak256, Address, Bloom, BlockNumber, Bytes, B256, B64, U256};
use voltic_rlp::{BufMut, Decodable, Encodable, Header as RlpHeader};

/// An Ethereum execution-layer block header.
///
/// Fields introduced by later hardforks are optional; RLP encoding emits
/// them in activation order and stops at the first absent one, so a
/// header always re-encodes to the byte sequence it was decoded from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Header {
    /// Keccak-256 hash of the parent block's header.
    pub parent_hash: B256,
    /// Keccak-256 hash of the ommers list; the empty-list hash
    /// post-merge.
    pub ommers_hash: B256,
    /// The address collecting this block's fees.
    pub beneficiary: Address,
    /// Root of the state trie after executing this block.
    pub state_root: B256,
    /// Root of the trie of this block's transactions.
    pub transactions_root: B256,
    /// Root of the trie of this block's receipts.
    pub receipts_root: B256,
    /// Union of the blooms of every receipt in the block.
    pub logs_bloom: Bloom,
    /// Proof-of-work difficulty; zero post-merge.
    pub difficulty: U256,
    /// The number of ancestor blocks.
    pub number: BlockNumber,
    /// The gas expenditure cap for the block.
    pub gas_limit: u64,
    /// The total gas used by the block's transactions.
    pub gas_used: u64,
    /// The block's Unix timestamp.
    pub timestamp: u64,
    /// Arbitrary extra data, at most 32 bytes.
    pub extra_data: Bytes,
    /// Proof-of-work mix hash; the prev-randao value post-merge.
    pub mix_hash: B256,
    /// Proof-of-work nonce; zero post-merge.
    pub nonce: B64,
    /// EIP-1559 base fee, from London.
    pub base_fee_per_gas: Option<u64>,
    /// EIP-4895 withdrawals root, from Shanghai.
    pub withdrawals_root: Option<B256>,
    /// EIP-4844 blob gas used, from Cancun.
    pub blob_gas_used: Option<u64>,
    /// EIP-4844 excess blob gas, from Cancun.
    pub excess_blob_gas: Option<u64>,
    /// EIP-4788 parent beacon block root, from Cancun.
    pub parent_beacon_block_root: Option<B256>,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            parent_hash: B256::ZERO,
            ommers_hash: EMPTY_OMMER_ROOT_HASH,
            beneficiary: Address::ZERO,
            state_root: EMPTY_ROOT_HASH,
            transactions_root: EMPTY_ROOT_HASH,
            receipts_root: EMPTY_ROOT_HASH,
            logs_bloom: Bloom::ZERO,
            difficulty: U256::ZERO,
            number: 0,
            gas_limit: 0,
            gas_used: 0,
            timestamp: 0,
            extra_data: Bytes::new(),
            mix_hash: B256::ZERO,
            nonce: B64::ZERO,
            base_fee_per_gas: None,
            withdrawals_root: None,
            blob_gas_used: None,
            excess_blob_gas: None,
            parent_beacon_block_root: None,
        }
    }
}

impl Header {
    /// The block hash: Keccak-256 of the RLP encoding. Recomputed on
    /// every call.
    pub fn hash_slow(&self) -> B256 {
        keccak256(voltic_rlp::encode(self))
    }

    /// True if the header commits to empty transaction and ommer lists.
    pub fn transactions_and_ommers_empty(&self) -> bool {
        self.transactions_root == EMPTY_ROOT_HASH && self.ommers_hash == EMPTY_OMMER_ROOT_HASH
    }

    fn rlp_payload_length(&self) -> usize {
        let mut length = self.parent_hash.length()
            + self.ommers_hash.length()
            + self.beneficiary.length()
            + self.state_root.length()
            + self.transactions_root.length()
            + self.receipts_root.length()
            + self.logs_bloom.length()
            + self.difficulty.length()
            + self.number.length()
            + self.gas_limit.length()
            + self.gas_used.length()
            + self.timestamp.length()
            + Encodable::length(&self.extra_data)
            + self.mix_hash.length()
            + self.nonce.length();
        if let Some(base_fee) = self.base_fee_per_gas {
            length += base_fee.length();
        }
        if let Some(root) = self.withdrawals_root {
            length += root.length();
        }
        if let Some(blob_gas) = self.blob_gas_used {
            length += blob_gas.length();
        }
        if let Some(excess) = self.excess_blob_gas {
            length += excess.length();
        }
        if let Some(root) = self.parent_beacon_block_root {
            length += root.length();
        }
        length
    }
}

impl Encodable for Header {
    fn encode(&self, out: &mut dyn BufMut) {
        RlpHeader { list: true, payload_length: self.rlp_payload_length() }.encode(out);
        self.parent_hash.encode(out);
        self.ommers_hash.encode(out);
        self.beneficiary.encode(out);
        self.state_root.encode(out);
        self.transactions_root.encode(out);
        self.receipts_root.encode(out);
        self.logs_bloom.encode(out);
        self.difficulty.encode(out);
        self.number.encode(out);
        self.gas_limit.encode(out);
        self.gas_used.encode(out);
        self.timestamp.encode(out);
        Encodable::encode(&self.extra_data, out);
        self.mix_hash.encode(out);
        self.nonce.encode(out);

        // optional fields are emitted in activation order; encoding stops
        // at the first absent one
        if let Some(base_fee) = self.base_fee_per_gas {
            base_fee.encode(out);
        }
        if let Some(root) = self.withdrawals_root {
            root.encode(out);
        }
        if let Some(blob_gas) = self.blob_gas_used {
            blob_gas.encode(out);
        }
        if let Some(excess) = self.excess_blob_gas {
            excess.encode(out);
        }
        if let Some(root) = self.parent_beacon_block_root {
            root.encode(out);
        }
    }

    fn length(&self) -> usize {
        let payload_length = self.rlp_payload_length();
        voltic_rlp::length_of_length(payload_length) + payload_length
    }
}

impl Decodable for Header {
    fn decode(buf: &mut &[u8]) -> voltic_rlp::Result<Self> {
        let header = RlpHeader::decode(buf)?;
        if !header.list {
            return Err(voltic_rlp::Error::UnexpectedString);
        }
        let started = buf.len();

        let mut this = Self {
            parent_hash: Decodable::decode(buf)?,
            ommers_hash: Decodable::decode(buf)?,
            beneficiary: Decodable::decode(buf)?,
            state_root: Decodable::decode(buf)?,
            transactions_root: Decodable::decode(buf)?,
            receipts_root: Decodable::decode(buf)?,
            logs_bloom: Decodable::decode(buf)?,
            difficulty: Decodable::decode(buf)?,
            number: Decodable::decode(buf)?,
            gas_limit: Decodable::decode(buf)?,
            gas_used: Decodable::decode(buf)?,
            timestamp: Decodable::decode(buf)?,
            extra_data: Decodable::decode(buf)?,
            mix_hash: Decodable::decode(buf)?,
            nonce: Decodable::decode(buf)?,
            base_fee_per_gas: None,
            withdrawals_root: None,
            blob_gas_used: None,
            excess_blob_gas: None,
            parent_beacon_block_root: None,
        };

        let consumed = |buf: &&[u8]| started - buf.len();
        if consumed(buf) < header.payload_length {
            this.base_fee_per_gas = Some(Decodable::decode(buf)?);
        }
        if consumed(buf) < header.payload_length {
            this.withdrawals_root = Some(Decodable::decode(buf)?);
        }
        if consumed(buf) < header.payload_length {
            this.blob_gas_used = Some(Decodable::decode(buf)?);
        }
        if consumed(buf) < header.payload_length {
            this.excess_blob_gas = Some(Decodable::decode(buf)?);
        }
        if consumed(buf) < header.payload_length {
            this.parent_beacon_block_root = Some(Decodable::decode(buf)?);
        }

        if consumed(buf) != header.payload_length {
            return Err(voltic_rlp::Error::ListLengthMismatch {
                expected: header.payload_length,
                got: consumed(buf),
            });
        }
        Ok(this)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_merge_header() -> Header {
        Header {
            number: 17_000_000,
            gas_limit: 30_000_000,
            gas_used: 12_345_678,
            timestamp: 1_681_338_455,
            base_fee_per_gas: Some(22_000_000_000),
            withdrawals_root: Some(EMPTY_ROOT_HASH),
            ..Default::default()
        }
    }

    #[test]
    fn rlp_roundtrip_without_optionals() {
        let header = Header::default();
        let encoded = voltic_rlp::encode(&header);
        assert_eq!(voltic_rlp::decode_exact::<Header>(&encoded).unwrap(), header);
    }

    #[test]
    fn rlp_roundtrip_with_optionals() {
        let header = post_merge_header();
        let encoded = voltic_rlp::encode(&header);
        assert_eq!(voltic_rlp::decode_exact::<Header>(&encoded).unwrap(), header);
    }

    #[test]
    fn rlp_roundtrip_cancun_fields() {
        let header = Header {
            blob_gas_used: Some(131_072),
            excess_blob_gas: Some(0),
            parent_beacon_block_root: Some(B256::repeat_byte(0x42)),
            ..post_merge_header()
        };
        let encoded = voltic_rlp::encode(&header);
        assert_eq!(voltic_rlp::decode_exact::<Header>(&encoded).unwrap(), header);
    }

    #[test]
    fn hash_changes_with_contents() {
        let a = post_merge_header();
        let mut b = a.clone();
        b.number += 1;
        assert_ne!(a.hash_slow(), b.hash_slow());
    }
}
