use super::{
    kzg_to_versioned_hash, trusted_setup, Blob, Bytes48, KzgError, MAX_BLOBS_PER_TRANSACTION,
};
use voltic_primitives::B256;

/// The blobs, commitments, and proofs carried alongside an EIP-4844
/// transaction in the network representation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BlobTransactionSidecar {
    /// The blob payloads.
    pub blobs: Vec<Blob>,
    /// One KZG commitment per blob.
    pub commitments: Vec<Bytes48>,
    /// One KZG proof per blob.
    pub proofs: Vec<Bytes48>,
}

/// Errors validating a sidecar against a transaction.
#[derive(Debug, thiserror::Error)]
pub enum BlobValidationError {
    /// Blob, commitment, and proof counts disagree.
    #[error("sidecar shape mismatch: {blobs} blobs, {commitments} commitments, {proofs} proofs")]
    ShapeMismatch {
        /// Number of blobs.
        blobs: usize,
        /// Number of commitments.
        commitments: usize,
        /// Number of proofs.
        proofs: usize,
    },
    /// The blob count is zero or above the per-transaction cap.
    #[error("invalid blob count: {0}")]
    InvalidBlobCount(usize),
    /// The sidecar's commitments do not hash to the transaction's
    /// versioned hashes.
    #[error("versioned hash mismatch at blob {0}")]
    VersionedHashMismatch(usize),
    /// A blob proof failed verification.
    #[error("blob proof {0} is invalid")]
    InvalidProof(usize),
    /// The KZG backend failed.
    #[error(transparent)]
    Kzg(#[from] KzgError),
}

impl BlobTransactionSidecar {
    /// Assembles a sidecar from parts.
    pub const fn new(blobs: Vec<Blob>, commitments: Vec<Bytes48>, proofs: Vec<Bytes48>) -> Self {
        Self { blobs, commitments, proofs }
    }

    /// Builds a sidecar from blobs alone, computing commitments and
    /// whole-blob proofs with the resident trusted setup.
    pub fn try_from_blobs(blobs: Vec<Blob>) -> Result<Self, KzgError> {
        let mut commitments = Vec::with_capacity(blobs.len());
        let mut proofs = Vec::with_capacity(blobs.len());
        for blob in &blobs {
            let commitment = trusted_setup::blob_to_commitment(blob)?;
            let proof = trusted_setup::compute_blob_proof(blob, &commitment)?;
            commitments.push(commitment);
            proofs.push(proof);
        }
        Ok(Self { blobs, commitments, proofs })
    }

    /// The number of blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// True if the sidecar carries no blobs.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// An iterator over the versioned hashes of the commitments.
    pub fn versioned_hashes(&self) -> impl Iterator<Item = B256> + '_ {
        self.commitments.iter().map(|c| kzg_to_versioned_hash(c.as_slice()))
    }

    /// The versioned hash of the commitment for blob `index`.
    pub fn versioned_hash_for_blob(&self, index: usize) -> Option<B256> {
        self.commitments.get(index).map(|c| kzg_to_versioned_hash(c.as_slice()))
    }

    /// Validates the sidecar against a transaction's versioned hashes:
    /// shape, count bounds, hash correspondence, and per-blob proof
    /// verification.
    pub fn validate(&self, versioned_hashes: &[B256]) -> Result<(), BlobValidationError> {
        if self.blobs.len() != self.commitments.len() || self.blobs.len() != self.proofs.len() {
            return Err(BlobValidationError::ShapeMismatch {
                blobs: self.blobs.len(),
                commitments: self.commitments.len(),
                proofs: self.proofs.len(),
            });
        }
        if self.blobs.is_empty() || self.blobs.len() > MAX_BLOBS_PER_TRANSACTION {
            return Err(BlobValidationError::InvalidBlobCount(self.blobs.len()));
        }
        if versioned_hashes.len() != self.blobs.len() {
            return Err(BlobValidationError::ShapeMismatch {
                blobs: self.blobs.len(),
                commitments: self.commitments.len(),
                proofs: versioned_hashes.len(),
            });
        }

        for (i, (commitment, expected)) in
            self.commitments.iter().zip(versioned_hashes).enumerate()
        {
            if kzg_to_versioned_hash(commitment.as_slice()) != *expected {
                return Err(BlobValidationError::VersionedHashMismatch(i));
            }
        }

        // batch verification is unimplemented by policy, so verify one
        // blob at a time
        for (i, ((blob, commitment), proof)) in
            self.blobs.iter().zip(&self.commitments).zip(&self.proofs).enumerate()
        {
            if !trusted_setup::verify_blob_proof(blob, commitment, proof)? {
                return Err(BlobValidationError::InvalidProof(i));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sidecar() -> BlobTransactionSidecar {
        trusted_setup::load_trusted_setup(None).unwrap();
        BlobTransactionSidecar::try_from_blobs(vec![Blob::ZERO]).unwrap()
    }

    #[test]
    fn valid_sidecar_passes() {
        let sidecar = sidecar();
        let hashes: Vec<_> = sidecar.versioned_hashes().collect();
        sidecar.validate(&hashes).unwrap();
    }

    #[test]
    fn wrong_versioned_hash_fails() {
        let sidecar = sidecar();
        assert!(matches!(
            sidecar.validate(&[B256::ZERO]),
            Err(BlobValidationError::VersionedHashMismatch(0))
        ));
    }

    #[test]
    fn empty_sidecar_fails() {
        trusted_setup::load_trusted_setup(None).unwrap();
        let empty = BlobTransactionSidecar::default();
        assert!(matches!(
            empty.validate(&[]),
            Err(BlobValidationError::InvalidBlobCount(0))
        ));
    }

    #[test]
    fn shape_mismatch_fails() {
        let mut sidecar = sidecar();
        sidecar.proofs.clear();
        let hashes: Vec<_> = sidecar.versioned_hashes().collect();
        assert!(matches!(
            sidecar.validate(&hashes),
            Err(BlobValidationError::ShapeMismatch { .. })
        ));
    }
}
