use crate::{
    constants::MIN_TRANSACTION_GAS, SignableTransaction, Signed, Transaction, TxType,
    TxValidationError,
};
use voltic_eips::eip2930::AccessList;
use voltic_eips::eip4844::{is_valid_versioned_hash, MAX_BLOBS_PER_TRANSACTION};
use voltic_eips::eip7702::SignedAuthorization;
use voltic_primitives::{keccak256, Address, Bytes, ChainId, Signature, TxKind, B256, U256};
use voltic_rlp::{BufMut, Decodable, Encodable, Header};

/// An [EIP-4844] blob transaction.
///
/// Blob transactions cannot create contracts: `to` is always an address.
/// The blobs themselves travel in a sidecar; the transaction commits to
/// them through versioned hashes.
///
/// [EIP-4844]: https://eips.ethereum.org/EIPS/eip-4844
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TxEip4844 {
    /// EIP-155 replay protection; never zero.
    pub chain_id: ChainId,
    /// The sender's account nonce.
    pub nonce: u64,
    /// Priority fee cap per gas (the tip).
    pub max_priority_fee_per_gas: u128,
    /// Total fee cap per gas.
    pub max_fee_per_gas: u128,
    /// The gas limit, paid up front.
    pub gas_limit: u64,
    /// The call target. Creation is forbidden for blob transactions.
    pub to: Address,
    /// Wei transferred to the target.
    pub value: U256,
    /// Addresses and storage keys warmed at the start of execution.
    pub access_list: AccessList,
    /// Commitments to the carried blobs: `0x01 ‖ sha256(commitment)[1..]`
    /// per blob.
    pub blob_versioned_hashes: Vec<B256>,
    /// Fee cap per unit of blob gas.
    pub max_fee_per_blob_gas: u128,
    /// Calldata.
    pub input: Bytes,
}

impl TxEip4844 {
    pub(crate) fn fields_len(&self) -> usize {
        self.chain_id.length()
            + self.nonce.length()
            + self.max_priority_fee_per_gas.length()
            + self.max_fee_per_gas.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + Encodable::length(&self.input)
            + self.access_list.length()
            + self.max_fee_per_blob_gas.length()
            + self.blob_versioned_hashes.length()
    }

    pub(crate) fn encode_fields(&self, out: &mut dyn BufMut) {
        self.chain_id.encode(out);
        self.nonce.encode(out);
        self.max_priority_fee_per_gas.encode(out);
        self.max_fee_per_gas.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        Encodable::encode(&self.input, out);
        self.access_list.encode(out);
        self.max_fee_per_blob_gas.encode(out);
        self.blob_versioned_hashes.encode(out);
    }

    pub(crate) fn decode_fields(buf: &mut &[u8]) -> voltic_rlp::Result<Self> {
        Ok(Self {
            chain_id: Decodable::decode(buf)?,
            nonce: Decodable::decode(buf)?,
            max_priority_fee_per_gas: Decodable::decode(buf)?,
            max_fee_per_gas: Decodable::decode(buf)?,
            gas_limit: Decodable::decode(buf)?,
            to: Decodable::decode(buf)?,
            value: Decodable::decode(buf)?,
            input: Decodable::decode(buf)?,
            access_list: Decodable::decode(buf)?,
            max_fee_per_blob_gas: Decodable::decode(buf)?,
            blob_versioned_hashes: Decodable::decode(buf)?,
        })
    }

    /// Encodes the signed body: a list of the fields followed by
    /// `y_parity, r, s`. No type byte.
    pub fn encode_with_signature_fields(&self, signature: &Signature, out: &mut dyn BufMut) {
        let payload_length = self.fields_len() + signature.rlp_vrs_len();
        Header { list: true, payload_length }.encode(out);
        self.encode_fields(out);
        signature.write_rlp_vrs(out);
    }

    /// The encoded length of the signed body, including the type byte.
    pub fn encoded_len_with_signature(&self, signature: &Signature) -> usize {
        let payload_length = self.fields_len() + signature.rlp_vrs_len();
        1 + Header { list: true, payload_length }.length() + payload_length
    }

    /// Decodes the signed body following the type byte.
    pub fn decode_signed_fields(buf: &mut &[u8]) -> voltic_rlp::Result<Signed<Self>> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(voltic_rlp::Error::UnexpectedString);
        }
        let original_len = buf.len();

        let tx = Self::decode_fields(buf)?;
        let signature = Signature::decode_rlp_vrs(buf)?;

        if original_len - buf.len() != header.payload_length {
            return Err(voltic_rlp::Error::ListLengthMismatch {
                expected: header.payload_length,
                got: original_len - buf.len(),
            });
        }

        Ok(tx.into_signed(signature))
    }

    /// Checks the structural bounds of spec'd fields: chain id, gas
    /// floor, blob count in `[1, 6]`, and the versioned-hash tag byte.
    pub fn validate(&self) -> Result<(), TxValidationError> {
        if self.chain_id == 0 {
            return Err(TxValidationError::ChainIdZero);
        }
        if self.gas_limit < MIN_TRANSACTION_GAS {
            return Err(TxValidationError::GasLimitTooLow(self.gas_limit));
        }
        let count = self.blob_versioned_hashes.len();
        if count == 0 || count > MAX_BLOBS_PER_TRANSACTION {
            return Err(TxValidationError::InvalidBlobCount(count));
        }
        for hash in &self.blob_versioned_hashes {
            if !is_valid_versioned_hash(hash) {
                return Err(TxValidationError::InvalidVersionedHash(*hash));
            }
        }
        Ok(())
    }

    pub(crate) const fn tx_type(&self) -> TxType {
        TxType::Eip4844
    }
}

impl Transaction for TxEip4844 {
    fn chain_id(&self) -> Option<ChainId> {
        Some(self.chain_id)
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }

    fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    fn gas_price(&self) -> Option<u128> {
        None
    }

    fn max_fee_per_gas(&self) -> u128 {
        self.max_fee_per_gas
    }

    fn max_priority_fee_per_gas(&self) -> Option<u128> {
        Some(self.max_priority_fee_per_gas)
    }

    fn max_fee_per_blob_gas(&self) -> Option<u128> {
        Some(self.max_fee_per_blob_gas)
    }

    fn kind(&self) -> TxKind {
        TxKind::Call(self.to)
    }

    fn value(&self) -> U256 {
        self.value
    }

    fn input(&self) -> &Bytes {
        &self.input
    }

    fn ty(&self) -> u8 {
        TxType::Eip4844 as u8
    }

    fn access_list(&self) -> Option<&AccessList> {
        Some(&self.access_list)
    }

    fn blob_versioned_hashes(&self) -> Option<&[B256]> {
        Some(&self.blob_versioned_hashes)
    }

    fn authorization_list(&self) -> Option<&[SignedAuthorization]> {
        None
    }
}

impl SignableTransaction<Signature> for TxEip4844 {
    fn set_chain_id(&mut self, chain_id: ChainId) {
        self.chain_id = chain_id;
    }

    fn encode_for_signing(&self, out: &mut dyn BufMut) {
        out.put_u8(self.tx_type() as u8);
        Header { list: true, payload_length: self.fields_len() }.encode(out);
        self.encode_fields(out);
    }

    fn payload_len_for_signature(&self) -> usize {
        let payload_length = self.fields_len();
        1 + Header { list: true, payload_length }.length() + payload_length
    }

    fn into_signed(self, signature: Signature) -> Signed<Self> {
        let mut buf = Vec::with_capacity(self.encoded_len_with_signature(&signature));
        buf.push(TxType::Eip4844 as u8);
        self.encode_with_signature_fields(&signature, &mut buf);
        let hash = keccak256(&buf);
        Signed::new_unchecked(self, signature, hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign_transaction;
    use voltic_primitives::{address, b256};

    fn versioned_hash(fill: u8) -> B256 {
        let mut hash = B256::repeat_byte(fill);
        hash.0[0] = 0x01;
        hash
    }

    fn sample() -> TxEip4844 {
        TxEip4844 {
            chain_id: 1,
            nonce: 11,
            max_priority_fee_per_gas: 1_000_000_000,
            max_fee_per_gas: 30_000_000_000,
            gas_limit: 21_000,
            to: address!("1111111111111111111111111111111111111111"),
            value: U256::ZERO,
            access_list: AccessList::default(),
            blob_versioned_hashes: vec![versioned_hash(0xaa)],
            max_fee_per_blob_gas: 2_000_000_000,
            input: Bytes::new(),
        }
    }

    #[test]
    fn sign_recover_roundtrip() {
        let secret =
            b256!("4646464646464646464646464646464646464646464646464646464646464646");
        let signed = sign_transaction(sample(), &secret).unwrap();
        assert_eq!(
            signed.recover_signer().unwrap(),
            address!("9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f")
        );
    }

    #[test]
    fn signed_body_roundtrip() {
        let secret =
            b256!("4646464646464646464646464646464646464646464646464646464646464646");
        let signed = sign_transaction(sample(), &secret).unwrap();

        let mut encoded = Vec::new();
        signed.tx().encode_with_signature_fields(signed.signature(), &mut encoded);
        let decoded = TxEip4844::decode_signed_fields(&mut &encoded[..]).unwrap();
        assert_eq!(decoded, signed);
    }

    #[test]
    fn blob_count_bounds() {
        let mut tx = sample();
        tx.blob_versioned_hashes.clear();
        assert_eq!(tx.validate(), Err(TxValidationError::InvalidBlobCount(0)));

        tx.blob_versioned_hashes = vec![versioned_hash(0x11); 7];
        assert_eq!(tx.validate(), Err(TxValidationError::InvalidBlobCount(7)));

        tx.blob_versioned_hashes = vec![versioned_hash(0x11); 6];
        assert!(tx.validate().is_ok());
    }

    #[test]
    fn version_byte_is_checked() {
        let mut tx = sample();
        let untagged = B256::repeat_byte(0x02);
        tx.blob_versioned_hashes = vec![untagged];
        assert_eq!(
            tx.validate(),
            Err(TxValidationError::InvalidVersionedHash(untagged))
        );
    }
}
