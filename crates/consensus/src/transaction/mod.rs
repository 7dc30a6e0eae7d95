//! The five Ethereum transaction variants and their shared traits.

mod eip1559;
mod eip2930;
mod eip4844;
mod eip7702;
mod envelope;
mod legacy;
mod tx_type;
mod typed;

pub use eip1559::TxEip1559;
pub use eip2930::TxEip2930;
pub use eip4844::TxEip4844;
pub use eip7702::TxEip7702;
pub use envelope::TxEnvelope;
pub use legacy::TxLegacy;
pub use tx_type::TxType;
pub use typed::{TypedTransaction, DEFAULT_FEE_BUMP_PERCENT};

use crate::Signed;
use voltic_eips::{eip2930::AccessList, eip7702::SignedAuthorization};
use voltic_primitives::{keccak256, Bytes, ChainId, TxKind, B256, U256};
use voltic_rlp::BufMut;

/// Shared read accessors over every transaction variant.
pub trait Transaction {
    /// The chain id, if the transaction declares one.
    fn chain_id(&self) -> Option<ChainId>;

    /// The sender's account nonce.
    fn nonce(&self) -> u64;

    /// The gas limit.
    fn gas_limit(&self) -> u64;

    /// The legacy gas price, for pre-1559 variants.
    fn gas_price(&self) -> Option<u128>;

    /// The fee cap per gas. For legacy variants this is the gas price.
    fn max_fee_per_gas(&self) -> u128;

    /// The priority fee cap per gas, for dynamic-fee variants.
    fn max_priority_fee_per_gas(&self) -> Option<u128>;

    /// The blob fee cap per blob gas, for blob variants.
    fn max_fee_per_blob_gas(&self) -> Option<u128>;

    /// The call target or creation marker.
    fn kind(&self) -> TxKind;

    /// The target address, or `None` for creation.
    fn to(&self) -> Option<voltic_primitives::Address> {
        self.kind().to().copied()
    }

    /// The wei transferred with the call.
    fn value(&self) -> U256;

    /// The calldata, or init code for creation.
    fn input(&self) -> &Bytes;

    /// The EIP-2718 type byte (0 for legacy).
    fn ty(&self) -> u8;

    /// The access list, for post-2930 variants.
    fn access_list(&self) -> Option<&AccessList>;

    /// The blob versioned hashes, for blob variants.
    fn blob_versioned_hashes(&self) -> Option<&[B256]>;

    /// The authorization list, for set-code variants.
    fn authorization_list(&self) -> Option<&[SignedAuthorization]>;

    /// The price actually paid per unit of gas under `base_fee`:
    /// `min(base_fee + priority_fee, max_fee)` for dynamic-fee variants,
    /// the gas price otherwise.
    fn effective_gas_price(&self, base_fee: Option<u64>) -> u128 {
        match self.gas_price() {
            Some(price) => price,
            None => voltic_eips::eip1559::effective_gas_price(
                self.max_fee_per_gas(),
                self.max_priority_fee_per_gas().unwrap_or_default(),
                base_fee,
            ),
        }
    }
}

/// A transaction that can compute its signing hash and be sealed with a
/// signature.
pub trait SignableTransaction<Sig>: Transaction + Sized {
    /// Overwrites the chain id.
    fn set_chain_id(&mut self, chain_id: ChainId);

    /// Encodes the signing preimage: for typed variants the type byte
    /// followed by the unsigned field list, for legacy the (possibly
    /// EIP-155 extended) unsigned field list.
    fn encode_for_signing(&self, out: &mut dyn BufMut);

    /// The length of the signing preimage.
    fn payload_len_for_signature(&self) -> usize;

    /// The digest the sender signs. Never includes the signature fields.
    fn signature_hash(&self) -> B256 {
        let mut buf = Vec::with_capacity(self.payload_len_for_signature());
        self.encode_for_signing(&mut buf);
        keccak256(buf)
    }

    /// Seals the transaction with `signature`, computing the transaction
    /// hash.
    fn into_signed(self, signature: Sig) -> Signed<Self, Sig>;
}
