use crate::{
    SignableTransaction, Signed, Transaction, TxEip1559, TxEip2930, TxEip4844, TxEip7702,
    TxLegacy, TxType, TxValidationError,
};
use voltic_eips::eip2930::AccessList;
use voltic_eips::eip7702::SignedAuthorization;
use voltic_primitives::{Bytes, ChainId, Signature, TxKind, B256, U256};
use voltic_rlp::BufMut;

/// The default fee bump applied when replacing a pending transaction.
pub const DEFAULT_FEE_BUMP_PERCENT: u64 = 10;

/// An unsigned transaction of any variant.
///
/// This is the shape produced by [`TxEnvelope::prepare_replacement`]
/// (signature cleared) and consumed by signing.
///
/// [`TxEnvelope::prepare_replacement`]: crate::TxEnvelope::prepare_replacement
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum TypedTransaction {
    /// An untyped legacy transaction.
    #[cfg_attr(feature = "serde", serde(rename = "0x0"))]
    Legacy(TxLegacy),
    /// An EIP-2930 access-list transaction.
    #[cfg_attr(feature = "serde", serde(rename = "0x1"))]
    Eip2930(TxEip2930),
    /// An EIP-1559 dynamic-fee transaction.
    #[cfg_attr(feature = "serde", serde(rename = "0x2"))]
    Eip1559(TxEip1559),
    /// An EIP-4844 blob transaction.
    #[cfg_attr(feature = "serde", serde(rename = "0x3"))]
    Eip4844(TxEip4844),
    /// An EIP-7702 set-code transaction.
    #[cfg_attr(feature = "serde", serde(rename = "0x4"))]
    Eip7702(TxEip7702),
}

/// Multiplies a fee by `(100 + percent) / 100`, rounding up.
fn bump_fee(fee: u128, percent: u64) -> u128 {
    fee.saturating_mul(100 + percent as u128).div_ceil(100)
}

macro_rules! delegate {
    ($self:expr => $tx:ident.$($rest:tt)*) => {
        match $self {
            Self::Legacy($tx) => $tx.$($rest)*,
            Self::Eip2930($tx) => $tx.$($rest)*,
            Self::Eip1559($tx) => $tx.$($rest)*,
            Self::Eip4844($tx) => $tx.$($rest)*,
            Self::Eip7702($tx) => $tx.$($rest)*,
        }
    };
}

impl TypedTransaction {
    /// The transaction type discriminator.
    pub const fn tx_type(&self) -> TxType {
        match self {
            Self::Legacy(_) => TxType::Legacy,
            Self::Eip2930(_) => TxType::Eip2930,
            Self::Eip1559(_) => TxType::Eip1559,
            Self::Eip4844(_) => TxType::Eip4844,
            Self::Eip7702(_) => TxType::Eip7702,
        }
    }

    /// Checks the structural bounds of the inner transaction.
    pub fn validate(&self) -> Result<(), TxValidationError> {
        delegate!(self => tx.validate())
    }

    /// Bumps the variant's fee fields in place by `percent`, rounding
    /// up: the gas price for legacy and 2930 transactions, both dynamic
    /// fee caps for 1559/4844/7702, and additionally the blob fee cap
    /// for 4844.
    pub fn bump_fees(&mut self, percent: u64) {
        match self {
            Self::Legacy(tx) => tx.gas_price = bump_fee(tx.gas_price, percent),
            Self::Eip2930(tx) => tx.gas_price = bump_fee(tx.gas_price, percent),
            Self::Eip1559(tx) => {
                tx.max_fee_per_gas = bump_fee(tx.max_fee_per_gas, percent);
                tx.max_priority_fee_per_gas = bump_fee(tx.max_priority_fee_per_gas, percent);
            }
            Self::Eip4844(tx) => {
                tx.max_fee_per_gas = bump_fee(tx.max_fee_per_gas, percent);
                tx.max_priority_fee_per_gas = bump_fee(tx.max_priority_fee_per_gas, percent);
                tx.max_fee_per_blob_gas = bump_fee(tx.max_fee_per_blob_gas, percent);
            }
            Self::Eip7702(tx) => {
                tx.max_fee_per_gas = bump_fee(tx.max_fee_per_gas, percent);
                tx.max_priority_fee_per_gas = bump_fee(tx.max_priority_fee_per_gas, percent);
            }
        }
    }
}

impl From<TxLegacy> for TypedTransaction {
    fn from(tx: TxLegacy) -> Self {
        Self::Legacy(tx)
    }
}

impl From<TxEip2930> for TypedTransaction {
    fn from(tx: TxEip2930) -> Self {
        Self::Eip2930(tx)
    }
}

impl From<TxEip1559> for TypedTransaction {
    fn from(tx: TxEip1559) -> Self {
        Self::Eip1559(tx)
    }
}

impl From<TxEip4844> for TypedTransaction {
    fn from(tx: TxEip4844) -> Self {
        Self::Eip4844(tx)
    }
}

impl From<TxEip7702> for TypedTransaction {
    fn from(tx: TxEip7702) -> Self {
        Self::Eip7702(tx)
    }
}

impl Transaction for TypedTransaction {
    fn chain_id(&self) -> Option<ChainId> {
        delegate!(self => tx.chain_id())
    }

    fn nonce(&self) -> u64 {
        delegate!(self => tx.nonce())
    }

    fn gas_limit(&self) -> u64 {
        delegate!(self => tx.gas_limit())
    }

    fn gas_price(&self) -> Option<u128> {
        delegate!(self => tx.gas_price())
    }

    fn max_fee_per_gas(&self) -> u128 {
        delegate!(self => tx.max_fee_per_gas())
    }

    fn max_priority_fee_per_gas(&self) -> Option<u128> {
        delegate!(self => tx.max_priority_fee_per_gas())
    }

    fn max_fee_per_blob_gas(&self) -> Option<u128> {
        delegate!(self => tx.max_fee_per_blob_gas())
    }

    fn kind(&self) -> TxKind {
        delegate!(self => tx.kind())
    }

    fn value(&self) -> U256 {
        delegate!(self => tx.value())
    }

    fn input(&self) -> &Bytes {
        delegate!(self => tx.input())
    }

    fn ty(&self) -> u8 {
        self.tx_type() as u8
    }

    fn access_list(&self) -> Option<&AccessList> {
        delegate!(self => tx.access_list())
    }

    fn blob_versioned_hashes(&self) -> Option<&[B256]> {
        delegate!(self => tx.blob_versioned_hashes())
    }

    fn authorization_list(&self) -> Option<&[SignedAuthorization]> {
        delegate!(self => tx.authorization_list())
    }
}

impl SignableTransaction<Signature> for TypedTransaction {
    fn set_chain_id(&mut self, chain_id: ChainId) {
        delegate!(self => tx.set_chain_id(chain_id))
    }

    fn encode_for_signing(&self, out: &mut dyn BufMut) {
        delegate!(self => tx.encode_for_signing(out))
    }

    fn payload_len_for_signature(&self) -> usize {
        delegate!(self => tx.payload_len_for_signature())
    }

    fn into_signed(self, signature: Signature) -> Signed<Self> {
        match self {
            Self::Legacy(tx) => {
                let signed = tx.into_signed(signature);
                let (tx, signature, hash) = signed.into_parts();
                Signed::new_unchecked(Self::Legacy(tx), signature, hash)
            }
            Self::Eip2930(tx) => {
                let (tx, signature, hash) = tx.into_signed(signature).into_parts();
                Signed::new_unchecked(Self::Eip2930(tx), signature, hash)
            }
            Self::Eip1559(tx) => {
                let (tx, signature, hash) = tx.into_signed(signature).into_parts();
                Signed::new_unchecked(Self::Eip1559(tx), signature, hash)
            }
            Self::Eip4844(tx) => {
                let (tx, signature, hash) = tx.into_signed(signature).into_parts();
                Signed::new_unchecked(Self::Eip4844(tx), signature, hash)
            }
            Self::Eip7702(tx) => {
                let (tx, signature, hash) = tx.into_signed(signature).into_parts();
                Signed::new_unchecked(Self::Eip7702(tx), signature, hash)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_rounds_up() {
        // 10% of 15 wei is 1.5, which must round to 2
        assert_eq!(bump_fee(15, 10), 17);
        assert_eq!(bump_fee(100, 10), 110);
        assert_eq!(bump_fee(0, 10), 0);
        // a zero bump keeps the fee
        assert_eq!(bump_fee(7, 0), 7);
    }

    #[test]
    fn legacy_bump_touches_gas_price_only() {
        let mut tx = TypedTransaction::Legacy(TxLegacy {
            gas_price: 100,
            ..Default::default()
        });
        tx.bump_fees(DEFAULT_FEE_BUMP_PERCENT);
        let TypedTransaction::Legacy(inner) = tx else { unreachable!() };
        assert_eq!(inner.gas_price, 110);
    }

    #[test]
    fn blob_bump_touches_blob_fee() {
        let mut tx = TypedTransaction::Eip4844(TxEip4844 {
            max_fee_per_gas: 100,
            max_priority_fee_per_gas: 10,
            max_fee_per_blob_gas: 30,
            ..Default::default()
        });
        tx.bump_fees(DEFAULT_FEE_BUMP_PERCENT);
        let TypedTransaction::Eip4844(inner) = tx else { unreachable!() };
        assert_eq!(inner.max_fee_per_gas, 110);
        assert_eq!(inner.max_priority_fee_per_gas, 11);
        assert_eq!(inner.max_fee_per_blob_gas, 33);
    }

    #[test]
    fn signing_preserves_variant() {
        use voltic_primitives::b256;

        let tx = TypedTransaction::Eip1559(TxEip1559 {
            chain_id: 1,
            gas_limit: 21_000,
            ..Default::default()
        });
        let secret =
            b256!("4646464646464646464646464646464646464646464646464646464646464646");
        let signed = crate::sign_transaction(tx, &secret).unwrap();
        assert_eq!(signed.tx().tx_type(), TxType::Eip1559);
    }
}
