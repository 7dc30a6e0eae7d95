//! Execution receipts and their log blooms.

use crate::TxType;
use voltic_eips::eip2718::{Decodable2718, Eip2718Error, Encodable2718};
use voltic_primitives::{Bloom, Log, B256};
use voltic_rlp::{BufMut, Decodable, Encodable, Header};

/// The post-execution state committed to by a receipt: the EIP-658
/// success flag, or the pre-Byzantium intermediate state root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Eip658Value {
    /// Transaction success (`1`) or failure (`0`).
    Eip658(bool),
    /// A pre-Byzantium state root.
    PostState(B256),
}

impl Eip658Value {
    /// True if the value indicates success. Post-state roots carry no
    /// success information and report `false`.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Eip658(true))
    }
}

impl From<bool> for Eip658Value {
    fn from(success: bool) -> Self {
        Self::Eip658(success)
    }
}

impl Encodable for Eip658Value {
    fn encode(&self, out: &mut dyn BufMut) {
        match self {
            Self::Eip658(success) => success.encode(out),
            Self::PostState(root) => root.encode(out),
        }
    }

    fn length(&self) -> usize {
        match self {
            Self::Eip658(success) => success.length(),
            Self::PostState(root) => root.length(),
        }
    }
}

impl Decodable for Eip658Value {
    fn decode(buf: &mut &[u8]) -> voltic_rlp::Result<Self> {
        let (header, _) = Header::decode_raw(buf, true)?;
        if header.payload_length == 32 {
            B256::decode(buf).map(Self::PostState)
        } else {
            bool::decode(buf).map(Self::Eip658)
        }
    }
}

/// The lifecycle status of a transaction as seen by a client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum TxReceiptStatus {
    /// Not yet included in a block.
    #[default]
    Pending,
    /// Included and executed successfully, with the gas it consumed.
    Success {
        /// Gas consumed by this transaction alone.
        gas_used: u64,
    },
    /// Included but reverted, with the revert reason when one was
    /// returned.
    Failed {
        /// The ABI-decoded revert reason string, if any.
        reason: Option<String>,
    },
}

impl TxReceiptStatus {
    /// True for the success state.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// The consensus receipt of a transaction: status, cumulative gas, and
/// the logs it emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Receipt {
    /// Execution outcome.
    pub status: Eip658Value,
    /// Gas used in the block up to and including this transaction.
    pub cumulative_gas_used: u64,
    /// Logs emitted during execution.
    pub logs: Vec<Log>,
}

impl Default for Receipt {
    fn default() -> Self {
        Self { status: Eip658Value::Eip658(false), cumulative_gas_used: 0, logs: Vec::new() }
    }
}

impl Receipt {
    /// Computes the receipt's bloom from its logs. This walks every log;
    /// [`ReceiptWithBloom`] caches the result.
    pub fn bloom_slow(&self) -> Bloom {
        self.logs.iter().collect()
    }

    /// Attaches the computed bloom.
    pub fn with_bloom(self) -> ReceiptWithBloom {
        self.into()
    }
}

/// The union of the blooms of `logs`; every receipt bloom is this over
/// the receipt's logs, and a block bloom is the union of its receipts'
/// blooms.
pub fn logs_bloom<'a>(logs: impl IntoIterator<Item = &'a Log>) -> Bloom {
    let mut bloom = Bloom::ZERO;
    for log in logs {
        bloom.accrue_log(log);
    }
    bloom
}

/// A [`Receipt`] with its log bloom attached.
///
/// Invariant: `logs_bloom` is exactly the union of the blooms of
/// `receipt.logs`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ReceiptWithBloom {
    /// The receipt.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub receipt: Receipt,
    /// The union of the blooms of the receipt's logs.
    pub logs_bloom: Bloom,
}

impl From<Receipt> for ReceiptWithBloom {
    fn from(receipt: Receipt) -> Self {
        let logs_bloom = receipt.bloom_slow();
        Self { receipt, logs_bloom }
    }
}

impl ReceiptWithBloom {
    /// Assembles from parts without recomputing the bloom.
    pub const fn new(receipt: Receipt, logs_bloom: Bloom) -> Self {
        Self { receipt, logs_bloom }
    }

    fn rlp_payload_length(&self) -> usize {
        self.receipt.status.length()
            + self.receipt.cumulative_gas_used.length()
            + self.logs_bloom.length()
            + self.receipt.logs.length()
    }
}

impl Encodable for ReceiptWithBloom {
    fn encode(&self, out: &mut dyn BufMut) {
        Header { list: true, payload_length: self.rlp_payload_length() }.encode(out);
        self.receipt.status.encode(out);
        self.receipt.cumulative_gas_used.encode(out);
        self.logs_bloom.encode(out);
        self.receipt.logs.encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.rlp_payload_length();
        voltic_rlp::length_of_length(payload_length) + payload_length
    }
}

impl Decodable for ReceiptWithBloom {
    fn decode(buf: &mut &[u8]) -> voltic_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(voltic_rlp::Error::UnexpectedString);
        }
        let started = buf.len();

        let status = Decodable::decode(buf)?;
        let cumulative_gas_used = Decodable::decode(buf)?;
        let logs_bloom = Decodable::decode(buf)?;
        let logs = Decodable::decode(buf)?;

        if started - buf.len() != header.payload_length {
            return Err(voltic_rlp::Error::ListLengthMismatch {
                expected: header.payload_length,
                got: started - buf.len(),
            });
        }

        Ok(Self { receipt: Receipt { status, cumulative_gas_used, logs }, logs_bloom })
    }
}

/// A receipt behind its EIP-2718 type flag: `type_byte_or_empty ++
/// RLP([status, cumulative_gas, bloom, logs])`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum ReceiptEnvelope {
    /// Receipt of an untyped legacy transaction.
    #[cfg_attr(feature = "serde", serde(rename = "0x0"))]
    Legacy(ReceiptWithBloom),
    /// Receipt of an EIP-2930 transaction.
    #[cfg_attr(feature = "serde", serde(rename = "0x1"))]
    Eip2930(ReceiptWithBloom),
    /// Receipt of an EIP-1559 transaction.
    #[cfg_attr(feature = "serde", serde(rename = "0x2"))]
    Eip1559(ReceiptWithBloom),
    /// Receipt of an EIP-4844 transaction.
    #[cfg_attr(feature = "serde", serde(rename = "0x3"))]
    Eip4844(ReceiptWithBloom),
    /// Receipt of an EIP-7702 transaction.
    #[cfg_attr(feature = "serde", serde(rename = "0x4"))]
    Eip7702(ReceiptWithBloom),
}

impl ReceiptEnvelope {
    /// Wraps a receipt with the type of the transaction it belongs to.
    pub const fn from_typed(tx_type: TxType, receipt: ReceiptWithBloom) -> Self {
        match tx_type {
            TxType::Legacy => Self::Legacy(receipt),
            TxType::Eip2930 => Self::Eip2930(receipt),
            TxType::Eip1559 => Self::Eip1559(receipt),
            TxType::Eip4844 => Self::Eip4844(receipt),
            TxType::Eip7702 => Self::Eip7702(receipt),
        }
    }

    /// The transaction type this receipt belongs to.
    pub const fn tx_type(&self) -> TxType {
        match self {
            Self::Legacy(_) => TxType::Legacy,
            Self::Eip2930(_) => TxType::Eip2930,
            Self::Eip1559(_) => TxType::Eip1559,
            Self::Eip4844(_) => TxType::Eip4844,
            Self::Eip7702(_) => TxType::Eip7702,
        }
    }

    /// The inner receipt.
    pub const fn as_receipt(&self) -> &ReceiptWithBloom {
        match self {
            Self::Legacy(r)
            | Self::Eip2930(r)
            | Self::Eip1559(r)
            | Self::Eip4844(r)
            | Self::Eip7702(r) => r,
        }
    }

    /// The receipt's log bloom.
    pub const fn logs_bloom(&self) -> &Bloom {
        &self.as_receipt().logs_bloom
    }
}

impl Encodable2718 for ReceiptEnvelope {
    fn type_flag(&self) -> Option<u8> {
        match self.tx_type() {
            TxType::Legacy => None,
            ty => Some(ty as u8),
        }
    }

    fn encode_2718_len(&self) -> usize {
        let inner = self.as_receipt().length();
        if self.tx_type().is_legacy() {
            inner
        } else {
            1 + inner
        }
    }

    fn encode_2718(&self, out: &mut dyn BufMut) {
        if let Some(ty) = self.type_flag() {
            out.put_u8(ty);
        }
        self.as_receipt().encode(out);
    }
}

impl Decodable2718 for ReceiptEnvelope {
    fn typed_decode(ty: u8, buf: &mut &[u8]) -> Result<Self, Eip2718Error> {
        let tx_type = TxType::try_from(ty)?;
        if tx_type.is_legacy() {
            return Err(Eip2718Error::UnexpectedType(0));
        }
        Ok(Self::from_typed(tx_type, ReceiptWithBloom::decode(buf)?))
    }

    fn fallback_decode(buf: &mut &[u8]) -> Result<Self, Eip2718Error> {
        Ok(Self::Legacy(ReceiptWithBloom::decode(buf)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voltic_primitives::{address, b256, Bytes};

    fn sample_log(marker: u8) -> Log {
        Log::new_unchecked(
            address!("388c818ca8b9251b393131c08a736a67ccb19297"),
            vec![b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef")],
            Bytes::from(vec![marker]),
        )
    }

    fn sample_receipt() -> Receipt {
        Receipt {
            status: Eip658Value::Eip658(true),
            cumulative_gas_used: 21_000,
            logs: vec![sample_log(1), sample_log(2)],
        }
    }

    #[test]
    fn bloom_invariant() {
        let with_bloom = sample_receipt().with_bloom();
        assert_eq!(with_bloom.logs_bloom, logs_bloom(&with_bloom.receipt.logs));
        assert!(!with_bloom.logs_bloom.is_zero());
    }

    #[test]
    fn block_bloom_is_union_of_receipt_blooms() {
        let a = sample_receipt().with_bloom();
        let b = Receipt { logs: vec![sample_log(9)], ..sample_receipt() }.with_bloom();
        let block: Bloom = [&a.logs_bloom, &b.logs_bloom].into_iter().collect();
        assert!(block.contains_bloom(&a.logs_bloom));
        assert!(block.contains_bloom(&b.logs_bloom));
    }

    #[test]
    fn rlp_roundtrip() {
        let receipt = sample_receipt().with_bloom();
        let encoded = voltic_rlp::encode(&receipt);
        assert_eq!(voltic_rlp::decode_exact::<ReceiptWithBloom>(&encoded).unwrap(), receipt);
    }

    #[test]
    fn envelope_roundtrip() {
        let envelope =
            ReceiptEnvelope::from_typed(TxType::Eip1559, sample_receipt().with_bloom());
        let encoded = envelope.encoded_2718();
        assert_eq!(encoded[0], 0x02);

        let mut slice = &encoded[..];
        let decoded = ReceiptEnvelope::decode_2718(&mut slice).unwrap();
        assert!(slice.is_empty());
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn pre_byzantium_status_is_a_state_root() {
        let root = b256!("56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421");
        let status = Eip658Value::PostState(root);
        let encoded = voltic_rlp::encode(&status);
        assert_eq!(encoded.len(), 33);
        assert_eq!(voltic_rlp::decode_exact::<Eip658Value>(&encoded).unwrap(), status);

        let flag = Eip658Value::Eip658(true);
        let encoded = voltic_rlp::encode(&flag);
        assert_eq!(encoded, [0x01]);
        assert_eq!(voltic_rlp::decode_exact::<Eip658Value>(&encoded).unwrap(), flag);
    }

    #[test]
    fn receipt_status_lifecycle() {
        assert!(!TxReceiptStatus::Pending.is_success());
        assert!(TxReceiptStatus::Success { gas_used: 21_000 }.is_success());
        assert!(!TxReceiptStatus::Failed { reason: Some("out of ink".into()) }.is_success());
    }
}
