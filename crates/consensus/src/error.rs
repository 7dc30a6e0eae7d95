use voltic_primitives::B256;

/// Structural validation failures for transactions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TxValidationError {
    /// A typed transaction declared chain id zero.
    #[error("chain id must not be zero on typed transactions")]
    ChainIdZero,
    /// The gas limit is below the intrinsic minimum for a call.
    #[error("gas limit {0} is below the 21000 intrinsic minimum")]
    GasLimitTooLow(u64),
    /// A blob transaction carried no versioned hashes.
    #[error("blob transactions must carry between 1 and 6 versioned hashes, got {0}")]
    InvalidBlobCount(usize),
    /// A versioned hash did not carry the KZG version tag.
    #[error("versioned hash {0} does not start with the 0x01 version byte")]
    InvalidVersionedHash(B256),
    /// A signing-dependent operation ran on an unsigned transaction.
    #[error("transaction is not signed")]
    NotSigned,
}
