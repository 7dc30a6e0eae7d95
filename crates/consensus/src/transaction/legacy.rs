use crate::{
    constants::MIN_TRANSACTION_GAS, SignableTransaction, Signed, Transaction, TxValidationError,
};
use voltic_eips::eip2930::AccessList;
use voltic_eips::eip7702::SignedAuthorization;
use voltic_primitives::{keccak256, Bytes, ChainId, Signature, TxKind, B256, U256};
use voltic_rlp::{BufMut, Decodable, Encodable, Header};

/// An untyped pre-EIP-2718 transaction.
///
/// With a chain id set, the signing hash covers the EIP-155 replay
/// protection fields and the signature's `v` embeds the chain id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TxLegacy {
    /// EIP-155 replay protection; `None` for pre-EIP-155 transactions.
    pub chain_id: Option<ChainId>,
    /// The sender's account nonce.
    pub nonce: u64,
    /// Wei paid per unit of gas.
    pub gas_price: u128,
    /// The gas limit, paid up front.
    pub gas_limit: u64,
    /// The call target, or the creation marker.
    pub to: TxKind,
    /// Wei transferred to the target.
    pub value: U256,
    /// Calldata, or init code for creation.
    pub input: Bytes,
}

impl TxLegacy {
    /// Outputs the length of the transaction's fields without an RLP
    /// header or the EIP-155 fields.
    pub(crate) fn fields_len(&self) -> usize {
        self.nonce.length()
            + self.gas_price.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + Encodable::length(&self.input)
    }

    /// Encodes the transaction's fields without an RLP header or the
    /// EIP-155 fields.
    pub(crate) fn encode_fields(&self, out: &mut dyn BufMut) {
        self.nonce.encode(out);
        self.gas_price.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        Encodable::encode(&self.input, out);
    }

    /// Length of the EIP-155 signing extension `[chain_id, 0, 0]`; zero
    /// for pre-EIP-155 transactions.
    pub(crate) fn eip155_fields_len(&self) -> usize {
        match self.chain_id {
            // chain id plus two single-byte zeros
            Some(id) => id.length() + 2,
            None => 0,
        }
    }

    /// Encodes the EIP-155 signing extension, if a chain id is set.
    pub(crate) fn encode_eip155_signing_fields(&self, out: &mut dyn BufMut) {
        if let Some(id) = self.chain_id {
            id.encode(out);
            0x00u8.encode(out);
            0x00u8.encode(out);
        }
    }

    fn signed_payload_length(&self, signature: &Signature) -> usize {
        self.fields_len()
            + signature.v(self.chain_id).length()
            + signature.rlp_rs_len()
    }

    /// Encodes the signed transaction: a list of the fields followed by
    /// `v, r, s`, with `v` carrying the EIP-155 chain id when set.
    pub fn encode_with_signature(&self, signature: &Signature, out: &mut dyn BufMut) {
        Header { list: true, payload_length: self.signed_payload_length(signature) }.encode(out);
        self.encode_fields(out);
        signature.v(self.chain_id).encode(out);
        signature.write_rlp_rs(out);
    }

    /// The encoded length of the signed transaction.
    pub fn encoded_len_with_signature(&self, signature: &Signature) -> usize {
        let payload_length = self.signed_payload_length(signature);
        Header { list: true, payload_length }.length() + payload_length
    }

    /// Decodes the field list of an unsigned transaction body.
    pub(crate) fn decode_fields(buf: &mut &[u8]) -> voltic_rlp::Result<Self> {
        Ok(Self {
            nonce: Decodable::decode(buf)?,
            gas_price: Decodable::decode(buf)?,
            gas_limit: Decodable::decode(buf)?,
            to: Decodable::decode(buf)?,
            value: Decodable::decode(buf)?,
            input: Decodable::decode(buf)?,
            chain_id: None,
        })
    }

    /// Decodes a signed transaction: a list header, the fields, and
    /// `v, r, s`. The chain id is extracted from `v`.
    pub fn decode_signed_fields(buf: &mut &[u8]) -> voltic_rlp::Result<Signed<Self>> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(voltic_rlp::Error::UnexpectedString);
        }
        let original_len = buf.len();

        let mut tx = Self::decode_fields(buf)?;
        let (signature, chain_id) = Signature::decode_rlp_legacy(buf)?;
        tx.chain_id = chain_id;

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
        if self.to.is_call() && self.gas_limit < MIN_TRANSACTION_GAS {
            return Err(TxValidationError::GasLimitTooLow(self.gas_limit));
        }
        Ok(())
    }
}

impl Transaction for TxLegacy {
    fn chain_id(&self) -> Option<ChainId> {
        self.chain_id
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }

    fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    fn gas_price(&self) -> Option<u128> {
        Some(self.gas_price)
    }

    fn max_fee_per_gas(&self) -> u128 {
        self.gas_price
    }

    fn max_priority_fee_per_gas(&self) -> Option<u128> {
        None
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
        0
    }

    fn access_list(&self) -> Option<&AccessList> {
        None
    }

    fn blob_versioned_hashes(&self) -> Option<&[B256]> {
        None
    }

    fn authorization_list(&self) -> Option<&[SignedAuthorization]> {
        None
    }
}

impl SignableTransaction<Signature> for TxLegacy {
    fn set_chain_id(&mut self, chain_id: ChainId) {
        self.chain_id = Some(chain_id);
    }

    fn encode_for_signing(&self, out: &mut dyn BufMut) {
        let payload_length = self.fields_len() + self.eip155_fields_len();
        Header { list: true, payload_length }.encode(out);
        self.encode_fields(out);
        self.encode_eip155_signing_fields(out);
    }

    fn payload_len_for_signature(&self) -> usize {
        let payload_length = self.fields_len() + self.eip155_fields_len();
        Header { list: true, payload_length }.length() + payload_length
    }

    fn into_signed(self, signature: Signature) -> Signed<Self> {
        let mut buf = Vec::with_capacity(self.encoded_len_with_signature(&signature));
        self.encode_with_signature(&signature, &mut buf);
        let hash = keccak256(&buf);
        Signed::new_unchecked(self, signature, hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign_transaction;
    use voltic_primitives::{address, b256, hex};

    /// The canonical EIP-155 example transaction.
    fn eip155_example() -> TxLegacy {
        TxLegacy {
            chain_id: Some(1),
            nonce: 9,
            gas_price: 20_000_000_000,
            gas_limit: 21_000,
            to: TxKind::Call(address!("3535353535353535353535353535353535353535")),
            value: U256::from(10u64).pow(U256::from(18u64)),
            input: Bytes::new(),
        }
    }

    #[test]
    fn eip155_signing_hash_matches_reference() {
        // signing data and hash from the EIP-155 specification text
        let tx = eip155_example();
        let mut preimage = Vec::new();
        tx.encode_for_signing(&mut preimage);
        assert_eq!(
            preimage,
            hex::decode(
                "ec098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080018080"
            )
            .unwrap()
        );
        assert_eq!(
            tx.signature_hash(),
            b256!("daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53")
        );
    }

    #[test]
    fn eip155_sign_and_recover() {
        let secret =
            b256!("4646464646464646464646464646464646464646464646464646464646464646");
        let signed = sign_transaction(eip155_example(), &secret).unwrap();

        // the EIP-155 example expects v = 37 on chain 1
        assert_eq!(signed.signature().v(signed.tx().chain_id), 37);
        assert_eq!(
            signed.recover_signer().unwrap(),
            address!("9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f")
        );
    }

    #[test]
    fn pre_eip155_hash_excludes_chain_fields() {
        let mut tx = eip155_example();
        tx.chain_id = None;
        let with_chain = eip155_example().signature_hash();
        assert_ne!(tx.signature_hash(), with_chain);
    }

    #[test]
    fn signed_roundtrip() {
        let secret =
            b256!("4646464646464646464646464646464646464646464646464646464646464646");
        let signed = sign_transaction(eip155_example(), &secret).unwrap();

        let mut encoded = Vec::new();
        signed.tx().encode_with_signature(signed.signature(), &mut encoded);
        let decoded = TxLegacy::decode_signed_fields(&mut &encoded[..]).unwrap();
        assert_eq!(decoded, signed);

        // byte-equal re-serialization
        let mut reencoded = Vec::new();
        decoded.tx().encode_with_signature(decoded.signature(), &mut reencoded);
        assert_eq!(reencoded, encoded);
    }

    #[test]
    fn decode_known_mainnet_transaction() {
        // mainnet transaction with an EIP-155 signature (chain id 1)
        let raw = hex::decode("f9015482078b8505d21dba0083022ef1947a250d5630b4cf539739df2c5dacb4c659f2488d880c46549a521b13d8b8e47ff36ab50000000000000000000000000000000000000000000066ab5a608bd00a23f2fe000000000000000000000000000000000000000000000000000000000000008000000000000000000000000048c04ed5691981c42154c6167398f95e8f38a7ff00000000000000000000000000000000000000000000000000000000632ceac70000000000000000000000000000000000000000000000000000000000000002000000000000000000000000c02aaa39b223fe8d0a0e5c4f27ead9083c756cc20000000000000000000000006c6ee5e31d828de241282b9606c8e98ea48526e225a0c9077369501641a92ef7399ff81c21639ed4fd8fc69cb793cfa1dbfab342e10aa0615facb2f1bcf3274a354cfe384a38d0cc008a11c2dd23a69111bc6930ba27a8").unwrap();

        let decoded = TxLegacy::decode_signed_fields(&mut &raw[..]).unwrap();
        assert_eq!(decoded.tx().chain_id, Some(1));
        assert_eq!(
            decoded.recover_signer().unwrap(),
            address!("a12e1462d0ced572f396f58b6e2d03894cd7c8a4")
        );
    }

    #[test]
    fn gas_floor_validation() {
        let mut tx = eip155_example();
        tx.gas_limit = 20_999;
        assert_eq!(tx.validate(), Err(TxValidationError::GasLimitTooLow(20_999)));
        // creation is exempt from the call floor
        tx.to = TxKind::Create;
        assert!(tx.validate().is_ok());
    }
}
