use crate::{
    constants::MIN_TRANSACTION_GAS, SignableTransaction, Signed, Transaction, TxType,
    TxValidationError,
};
use voltic_eips::eip2930::AccessList;
use voltic_eips::eip7702::SignedAuthorization;
use voltic_primitives::{keccak256, Address, Bytes, ChainId, Signature, TxKind, B256, U256};
use voltic_rlp::{BufMut, Decodable, Encodable, Header};

/// An [EIP-7702] set-code transaction.
///
/// Carries a list of signed authorizations that delegate the authorities'
/// code to the designated addresses. Creation is forbidden: `to` is
/// always an address.
///
/// [EIP-7702]: https://eips.ethereum.org/EIPS/eip-7702
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TxEip7702 {
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
    /// The call target.
    pub to: Address,
    /// Wei transferred to the target.
    pub value: U256,
    /// Addresses and storage keys warmed at the start of execution.
    pub access_list: AccessList,
    /// Signed delegations applied before execution.
    pub authorization_list: Vec<SignedAuthorization>,
    /// Calldata.
    pub input: Bytes,
}

impl TxEip7702 {
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
            + self.authorization_list.length()
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
        self.authorization_list.encode(out);
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
            authorization_list: Decodable::decode(buf)?,
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

    /// The intrinsic gas the authorization list adds, given how many of
    /// the recovered authorities are empty accounts.
    pub fn authorization_gas(&self, empty_accounts: u64) -> u64 {
        voltic_eips::eip7702::authorization_list_gas(
            self.authorization_list.len() as u64,
            empty_accounts,
        )
    }

    /// Checks the structural bounds of spec'd fields.
    pub fn validate(&self) -> Result<(), TxValidationError> {
        if self.chain_id == 0 {
            return Err(TxValidationError::ChainIdZero);
        }
        if self.gas_limit < MIN_TRANSACTION_GAS {
            return Err(TxValidationError::GasLimitTooLow(self.gas_limit));
        }
        Ok(())
    }

    pub(crate) const fn tx_type(&self) -> TxType {
        TxType::Eip7702
    }
}

impl Transaction for TxEip7702 {
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
        TxKind::Call(self.to)
    }

    fn value(&self) -> U256 {
        self.value
    }

    fn input(&self) -> &Bytes {
        &self.input
    }

    fn ty(&self) -> u8 {
        TxType::Eip7702 as u8
    }

    fn access_list(&self) -> Option<&AccessList> {
        Some(&self.access_list)
    }

    fn blob_versioned_hashes(&self) -> Option<&[B256]> {
        None
    }

    fn authorization_list(&self) -> Option<&[SignedAuthorization]> {
        Some(&self.authorization_list)
    }
}

impl SignableTransaction<Signature> for TxEip7702 {
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
        buf.push(TxType::Eip7702 as u8);
        self.encode_with_signature_fields(&signature, &mut buf);
        let hash = keccak256(&buf);
        Signed::new_unchecked(self, signature, hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign_transaction;
    use voltic_eips::eip7702::Authorization;
    use voltic_primitives::{address, b256};

    fn secret() -> B256 {
        b256!("4646464646464646464646464646464646464646464646464646464646464646")
    }

    fn sample() -> TxEip7702 {
        let authorization = Authorization {
            chain_id: U256::from(1u64),
            address: address!("2222222222222222222222222222222222222222"),
            nonce: 1,
        }
        .into_signed_with_key(&secret())
        .unwrap();

        TxEip7702 {
            chain_id: 1,
            nonce: 5,
            max_priority_fee_per_gas: 1_000_000_000,
            max_fee_per_gas: 30_000_000_000,
            gas_limit: 100_000,
            to: address!("6069a6c32cf691f5982febae4faf8a6f3ab2f0f6"),
            value: U256::ZERO,
            access_list: AccessList::default(),
            authorization_list: vec![authorization],
            input: Bytes::new(),
        }
    }

    #[test]
    fn sign_recover_roundtrip() {
        let signed = sign_transaction(sample(), &secret()).unwrap();
        assert_eq!(
            signed.recover_signer().unwrap(),
            address!("9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f")
        );
    }

    #[test]
    fn signed_body_roundtrip() {
        let signed = sign_transaction(sample(), &secret()).unwrap();

        let mut encoded = Vec::new();
        signed.tx().encode_with_signature_fields(signed.signature(), &mut encoded);
        let decoded = TxEip7702::decode_signed_fields(&mut &encoded[..]).unwrap();
        assert_eq!(decoded, signed);
    }

    #[test]
    fn authorities_recover_through_the_transaction() {
        let tx = sample();
        let authority =
            voltic_crypto::derive_public_key(&secret()).unwrap().to_address();
        let recovered: Vec<_> = tx
            .authorization_list
            .iter()
            .map(|auth| auth.recover_authority().unwrap())
            .collect();
        assert_eq!(recovered, [authority]);
    }

    #[test]
    fn authorization_gas() {
        let tx = sample();
        assert_eq!(tx.authorization_gas(0), 12_500);
        assert_eq!(tx.authorization_gas(1), 12_500 + 25_000);
    }
}
