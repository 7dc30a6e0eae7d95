use crate::{
    Signed, Transaction, TxEip1559, TxEip2930, TxEip4844, TxEip7702, TxLegacy, TxType,
    TxValidationError, TypedTransaction,
};
use voltic_eips::eip2718::{Decodable2718, Eip2718Error, Encodable2718, Typed2718};
use voltic_eips::eip2930::AccessList;
use voltic_eips::eip7702::SignedAuthorization;
use voltic_primitives::{Address, Bytes, ChainId, Signature, SignatureError, TxKind, B256, U256};
use voltic_rlp::{BufMut, Decodable, Encodable};

/// All signed Ethereum transaction variants behind one discriminated
/// union.
///
/// Serialization dispatches on the discriminator: legacy transactions are
/// bare RLP lists, typed transactions are `type_byte ++ RLP(fields)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum TxEnvelope {
    /// An untyped legacy transaction.
    #[cfg_attr(feature = "serde", serde(rename = "0x0"))]
    Legacy(Signed<TxLegacy>),
    /// An EIP-2930 access-list transaction.
    #[cfg_attr(feature = "serde", serde(rename = "0x1"))]
    Eip2930(Signed<TxEip2930>),
    /// An EIP-1559 dynamic-fee transaction.
    #[cfg_attr(feature = "serde", serde(rename = "0x2"))]
    Eip1559(Signed<TxEip1559>),
    /// An EIP-4844 blob transaction.
    #[cfg_attr(feature = "serde", serde(rename = "0x3"))]
    Eip4844(Signed<TxEip4844>),
    /// An EIP-7702 set-code transaction.
    #[cfg_attr(feature = "serde", serde(rename = "0x4"))]
    Eip7702(Signed<TxEip7702>),
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

impl TxEnvelope {
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

    /// The transaction hash.
    pub const fn hash(&self) -> &B256 {
        delegate!(self => tx.hash())
    }

    /// The signature.
    pub const fn signature(&self) -> &Signature {
        delegate!(self => tx.signature())
    }

    /// The digest the sender signed.
    pub fn signature_hash(&self) -> B256 {
        delegate!(self => tx.signature_hash())
    }

    /// Recovers the sender address from the signature.
    pub fn recover_signer(&self) -> Result<Address, SignatureError> {
        delegate!(self => tx.recover_signer())
    }

    /// Checks the structural bounds of the inner transaction.
    pub fn validate(&self) -> Result<(), TxValidationError> {
        match self {
            Self::Legacy(tx) => tx.tx().validate(),
            Self::Eip2930(tx) => tx.tx().validate(),
            Self::Eip1559(tx) => tx.tx().validate(),
            Self::Eip4844(tx) => tx.tx().validate(),
            Self::Eip7702(tx) => tx.tx().validate(),
        }
    }

    /// Builds the unsigned replacement for this transaction: the same
    /// nonce, per-variant fee fields bumped by `fee_bump_percent`
    /// (rounded up), and the signature cleared.
    pub fn prepare_replacement(&self, fee_bump_percent: u64) -> TypedTransaction {
        let mut replacement: TypedTransaction = match self {
            Self::Legacy(tx) => tx.tx().clone().into(),
            Self::Eip2930(tx) => tx.tx().clone().into(),
            Self::Eip1559(tx) => tx.tx().clone().into(),
            Self::Eip4844(tx) => tx.tx().clone().into(),
            Self::Eip7702(tx) => tx.tx().clone().into(),
        };
        replacement.bump_fees(fee_bump_percent);
        replacement
    }
}

impl From<Signed<TxLegacy>> for TxEnvelope {
    fn from(tx: Signed<TxLegacy>) -> Self {
        Self::Legacy(tx)
    }
}

impl From<Signed<TxEip2930>> for TxEnvelope {
    fn from(tx: Signed<TxEip2930>) -> Self {
        Self::Eip2930(tx)
    }
}

impl From<Signed<TxEip1559>> for TxEnvelope {
    fn from(tx: Signed<TxEip1559>) -> Self {
        Self::Eip1559(tx)
    }
}

impl From<Signed<TxEip4844>> for TxEnvelope {
    fn from(tx: Signed<TxEip4844>) -> Self {
        Self::Eip4844(tx)
    }
}

impl From<Signed<TxEip7702>> for TxEnvelope {
    fn from(tx: Signed<TxEip7702>) -> Self {
        Self::Eip7702(tx)
    }
}

impl Transaction for TxEnvelope {
    fn chain_id(&self) -> Option<ChainId> {
        delegate!(self => tx.tx().chain_id())
    }

    fn nonce(&self) -> u64 {
        delegate!(self => tx.tx().nonce())
    }

    fn gas_limit(&self) -> u64 {
        delegate!(self => tx.tx().gas_limit())
    }

    fn gas_price(&self) -> Option<u128> {
        delegate!(self => tx.tx().gas_price())
    }

    fn max_fee_per_gas(&self) -> u128 {
        delegate!(self => tx.tx().max_fee_per_gas())
    }

    fn max_priority_fee_per_gas(&self) -> Option<u128> {
        delegate!(self => tx.tx().max_priority_fee_per_gas())
    }

    fn max_fee_per_blob_gas(&self) -> Option<u128> {
        delegate!(self => tx.tx().max_fee_per_blob_gas())
    }

    fn kind(&self) -> TxKind {
        delegate!(self => tx.tx().kind())
    }

    fn value(&self) -> U256 {
        delegate!(self => tx.tx().value())
    }

    fn input(&self) -> &Bytes {
        delegate!(self => tx.tx().input())
    }

    fn ty(&self) -> u8 {
        self.tx_type() as u8
    }

    fn access_list(&self) -> Option<&AccessList> {
        delegate!(self => tx.tx().access_list())
    }

    fn blob_versioned_hashes(&self) -> Option<&[B256]> {
        delegate!(self => tx.tx().blob_versioned_hashes())
    }

    fn authorization_list(&self) -> Option<&[SignedAuthorization]> {
        delegate!(self => tx.tx().authorization_list())
    }
}

impl Typed2718 for TxEnvelope {
    fn ty(&self) -> u8 {
        self.tx_type() as u8
    }
}

impl Encodable2718 for TxEnvelope {
    fn type_flag(&self) -> Option<u8> {
        match self {
            Self::Legacy(_) => None,
            typed => Some(typed.tx_type() as u8),
        }
    }

    fn encode_2718_len(&self) -> usize {
        match self {
            Self::Legacy(tx) => tx.tx().encoded_len_with_signature(tx.signature()),
            Self::Eip2930(tx) => tx.tx().encoded_len_with_signature(tx.signature()),
            Self::Eip1559(tx) => tx.tx().encoded_len_with_signature(tx.signature()),
            Self::Eip4844(tx) => tx.tx().encoded_len_with_signature(tx.signature()),
            Self::Eip7702(tx) => tx.tx().encoded_len_with_signature(tx.signature()),
        }
    }

    fn encode_2718(&self, out: &mut dyn BufMut) {
        match self {
            Self::Legacy(tx) => tx.tx().encode_with_signature(tx.signature(), out),
            Self::Eip2930(tx) => {
                out.put_u8(TxType::Eip2930 as u8);
                tx.tx().encode_with_signature_fields(tx.signature(), out);
            }
            Self::Eip1559(tx) => {
                out.put_u8(TxType::Eip1559 as u8);
                tx.tx().encode_with_signature_fields(tx.signature(), out);
            }
            Self::Eip4844(tx) => {
                out.put_u8(TxType::Eip4844 as u8);
                tx.tx().encode_with_signature_fields(tx.signature(), out);
            }
            Self::Eip7702(tx) => {
                out.put_u8(TxType::Eip7702 as u8);
                tx.tx().encode_with_signature_fields(tx.signature(), out);
            }
        }
    }
}

impl Decodable2718 for TxEnvelope {
    fn typed_decode(ty: u8, buf: &mut &[u8]) -> Result<Self, Eip2718Error> {
        Ok(match TxType::try_from(ty)? {
            TxType::Legacy => return Err(Eip2718Error::UnexpectedType(0)),
            TxType::Eip2930 => Self::Eip2930(TxEip2930::decode_signed_fields(buf)?),
            TxType::Eip1559 => Self::Eip1559(TxEip1559::decode_signed_fields(buf)?),
            TxType::Eip4844 => Self::Eip4844(TxEip4844::decode_signed_fields(buf)?),
            TxType::Eip7702 => Self::Eip7702(TxEip7702::decode_signed_fields(buf)?),
        })
    }

    fn fallback_decode(buf: &mut &[u8]) -> Result<Self, Eip2718Error> {
        Ok(Self::Legacy(TxLegacy::decode_signed_fields(buf)?))
    }
}

/// Consensus (block body) encoding: the network representation.
impl Encodable for TxEnvelope {
    fn encode(&self, out: &mut dyn BufMut) {
        self.network_encode(out);
    }

    fn length(&self) -> usize {
        self.network_len()
    }
}

impl Decodable for TxEnvelope {
    fn decode(buf: &mut &[u8]) -> voltic_rlp::Result<Self> {
        Self::network_decode(buf).map_err(|err| match err {
            Eip2718Error::RlpError(err) => err,
            Eip2718Error::UnexpectedType(_) => {
                voltic_rlp::Error::Custom("unexpected transaction type")
            }
        })
    }
}

impl TxEnvelope {
    /// Deserializes from the raw 2718 envelope, requiring the input to be
    /// fully consumed. The declared input length is never trusted: the
    /// inner RLP parse must account for every byte after the type byte.
    pub fn decode_2718_exact(mut bytes: &[u8]) -> Result<Self, Eip2718Error> {
        let envelope = Self::decode_2718(&mut bytes)?;
        if !bytes.is_empty() {
            return Err(Eip2718Error::RlpError(voltic_rlp::Error::UnexpectedLength));
        }
        Ok(envelope)
    }
}
