use crate::{
    constants::MIN_TRANSACTION_GAS, SignableTransaction, Signed, Transaction, TxType,
    TxValidationError,
};
use voltic_eips::eip2930::AccessList;
use voltic_eips::eip7702::SignedAuthorization;
use voltic_primitives::{keccak256, Bytes, ChainId, Signature, TxKind, B256, U256};
use voltic_rlp::{BufMut, Decodable, Encodable, Header};

/// An [EIP-1559] dynamic-fee transaction.
///
/// [EIP-1559]: https://eips.ethereum.org/EIPS/eip-1559
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TxEip1559 {
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
    /// The call target, or the creation marker.
    pub to: TxKind,
    /// Wei transferred to the target.
    pub value: U256,
    /// Addresses and storage keys warmed at the start of execution.
    pub access_list: AccessList,
    /// Calldata, or init code for creation.
    pub input: Bytes,
}

impl TxEip1559 {
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

    /// Checks the structural bounds of spec'd fields.
    pub fn validate(&self) -> Result<(), TxValidationError> {
        if self.chain_id == 0 {
            return Err(TxValidationError::ChainIdZero);
        }
        if self.to.is_call() && self.gas_limit < MIN_TRANSACTION_GAS {
            return Err(TxValidationError::GasLimitTooLow(self.gas_limit));
        }
        Ok(())
    }

    pub(crate) const fn tx_type(&self) -> TxType {
        TxType::Eip1559
    }
}

impl Transaction for TxEip1559 {
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
        None
    }

    fn kind(&self) -> TxKind {
        self.to
    }

    fn value(&self) -> U256 {
        self.value
    }

    fn input(&self) -> &Bytes {
        &self.input
    }

    fn ty(&self) -> u8 {
        TxType::Eip1559 as u8
    }

    fn access_list(&self) -> Option<&AccessList> {
        Some(&self.access_list)
    }

    fn blob_versioned_hashes(&self) -> Option<&[B256]> {
        None
    }

    fn authorization_list(&self) -> Option<&[SignedAuthorization]> {
        None
    }
}

impl SignableTransaction<Signature> for TxEip1559 {
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
        buf.push(TxType::Eip1559 as u8);
        self.encode_with_signature_fields(&signature, &mut buf);
        let hash = keccak256(&buf);
        Signed::new_unchecked(self, signature, hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voltic_primitives::{address, b256, hex};

    /// A mainnet EIP-1559 transaction with a known signer.
    fn known_tx() -> (TxEip1559, Signature) {
        let tx = TxEip1559 {
            chain_id: 1,
            nonce: 0x42,
            gas_limit: 44386,
            to: TxKind::Call(address!("6069a6c32cf691f5982febae4faf8a6f3ab2f0f6")),
            value: U256::ZERO,
            input: hex::decode("a22cb4650000000000000000000000005eee75727d804a2b13038928d36f8b188945a57a0000000000000000000000000000000000000000000000000000000000000000").unwrap().into(),
            max_fee_per_gas: 0x4a817c800,
            max_priority_fee_per_gas: 0x3b9aca00,
            access_list: AccessList::default(),
        };
        let signature = Signature::from_scalars_and_parity(
            b256!("840cfc572845f5786e702984c2a582528cad4b49b2a10b9db1be7fca90058565"),
            b256!("25e7109ceb98168d95b09b18bbf6b685130e0562f233877d492b94eee0c5b6d1"),
            0,
        )
        .unwrap();
        (tx, signature)
    }

    #[test]
    fn signing_hash_matches_reference() {
        let (tx, _) = known_tx();
        assert_eq!(
            tx.signature_hash(),
            b256!("0d5688ac3897124635b6cf1bc0e29d6dfebceebdc10a54d74f2ef8b56535b682")
        );
    }

    #[test]
    fn recover_known_signer() {
        let (tx, signature) = known_tx();
        let signed = tx.into_signed(signature);
        assert_eq!(
            *signed.hash(),
            b256!("0ec0b6a2df4d87424e5f6ad2a654e27aaeb7dac20ae9e8385cc09087ad532ee0")
        );
        assert_eq!(
            signed.recover_signer().unwrap(),
            address!("dd6b8b3dc6b7ad97db52f08a275ff4483e024cea")
        );
    }

    #[test]
    fn signed_body_roundtrip() {
        let (tx, signature) = known_tx();
        let signed = tx.into_signed(signature);

        let mut encoded = Vec::new();
        signed.tx().encode_with_signature_fields(signed.signature(), &mut encoded);
        let decoded = TxEip1559::decode_signed_fields(&mut &encoded[..]).unwrap();
        assert_eq!(decoded, signed);
    }

    #[test]
    fn effective_gas_price_clamps() {
        let (tx, _) = known_tx();
        // base fee above cap: pay the cap
        assert_eq!(tx.effective_gas_price(Some(u64::MAX)), tx.max_fee_per_gas);
        // no base fee: pay the cap
        assert_eq!(tx.effective_gas_price(None), tx.max_fee_per_gas);
        // low base fee: base + tip
        assert_eq!(
            tx.effective_gas_price(Some(1_000_000_000)),
            1_000_000_000 + tx.max_priority_fee_per_gas
        );
    }

    #[test]
    fn validation() {
        let (mut tx, _) = known_tx();
        tx.chain_id = 0;
        assert_eq!(tx.validate(), Err(TxValidationError::ChainIdZero));
    }
}
