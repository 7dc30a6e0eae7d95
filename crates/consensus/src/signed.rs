use crate::transaction::SignableTransaction;
use voltic_primitives::{Address, Signature, SignatureError, B256};

/// A transaction sealed with its signature and transaction hash.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signed<T, Sig = Signature> {
    #[cfg_attr(feature = "serde", serde(flatten))]
    tx: T,
    signature: Sig,
    hash: B256,
}

impl<T, Sig> Signed<T, Sig> {
    /// A reference to the inner transaction.
    pub const fn tx(&self) -> &T {
        &self.tx
    }

    /// A reference to the signature.
    pub const fn signature(&self) -> &Sig {
        &self.signature
    }

    /// The transaction hash (Keccak-256 of the signed encoding).
    pub const fn hash(&self) -> &B256 {
        &self.hash
    }

    /// Splits into the transaction, signature, and hash.
    pub fn into_parts(self) -> (T, Sig, B256) {
        (self.tx, self.signature, self.hash)
    }

    /// Discards the signature, returning the inner transaction.
    pub fn strip_signature(self) -> T {
        self.tx
    }
}

impl<T: SignableTransaction<Sig>, Sig> Signed<T, Sig> {
    /// Instantiates from parts without verifying the signature or hash.
    pub const fn new_unchecked(tx: T, signature: Sig, hash: B256) -> Self {
        Self { tx, signature, hash }
    }

    /// The digest that was signed.
    pub fn signature_hash(&self) -> B256 {
        self.tx.signature_hash()
    }
}

impl<T: SignableTransaction<Signature>> Signed<T> {
    /// Recovers the signer of the transaction.
    pub fn recover_signer(&self) -> Result<Address, SignatureError> {
        self.signature.recover_address_from_prehash(&self.tx.signature_hash())
    }
}
