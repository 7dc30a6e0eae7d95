//! [EIP-4844] blob types, constants, and KZG commitment operations.
//!
//! The trusted setup is process-wide state with an explicit
//! load → use → free lifecycle; see [`trusted_setup`].
//!
//! [EIP-4844]: https://eips.ethereum.org/EIPS/eip-4844

mod sidecar;
pub mod trusted_setup;

pub use sidecar::{BlobTransactionSidecar, BlobValidationError};
pub use trusted_setup::{
    blob_from_slice, blob_to_commitment, compute_blob_proof, compute_proof, free_trusted_setup,
    is_initialized, load_trusted_setup, verify_blob_proof, verify_blob_proof_batch, verify_proof,
    KzgError,
};

use voltic_primitives::{FixedBytes, B256};

/// Number of field elements in a blob.
pub const FIELD_ELEMENTS_PER_BLOB: usize = 4096;

/// Size of a field element in bytes.
pub const FIELD_ELEMENT_BYTES: usize = 32;

/// Size of a blob in bytes: 4096 field elements of 32 bytes.
pub const BYTES_PER_BLOB: usize = FIELD_ELEMENTS_PER_BLOB * FIELD_ELEMENT_BYTES;

/// Size of a KZG commitment in bytes (a compressed G1 point).
pub const BYTES_PER_COMMITMENT: usize = 48;

/// Size of a KZG proof in bytes (a compressed G1 point).
pub const BYTES_PER_PROOF: usize = 48;

/// The maximum number of blobs a single transaction may carry.
pub const MAX_BLOBS_PER_TRANSACTION: usize = 6;

/// The version tag of a KZG versioned hash.
pub const VERSIONED_HASH_VERSION_KZG: u8 = 0x01;

/// Gas consumed per blob.
pub const DATA_GAS_PER_BLOB: u64 = 131_072;

/// A blob: 131072 bytes of field-element data.
pub type Blob = FixedBytes<BYTES_PER_BLOB>;

/// A 48-byte compressed G1 point: a commitment or a proof.
pub type Bytes48 = FixedBytes<48>;

/// Computes the versioned hash of a KZG commitment:
/// `0x01 ‖ sha256(commitment)[1..]`.
pub fn kzg_to_versioned_hash(commitment: &[u8]) -> B256 {
    debug_assert_eq!(commitment.len(), BYTES_PER_COMMITMENT);
    let mut hash = voltic_crypto::sha256(commitment);
    hash.0[0] = VERSIONED_HASH_VERSION_KZG;
    hash
}

/// True if `hash` carries the KZG version tag.
pub fn is_valid_versioned_hash(hash: &B256) -> bool {
    hash.0[0] == VERSIONED_HASH_VERSION_KZG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versioned_hash_is_tagged_sha256() {
        let commitment = [0u8; BYTES_PER_COMMITMENT];
        let versioned = kzg_to_versioned_hash(&commitment);
        assert_eq!(versioned.0[0], VERSIONED_HASH_VERSION_KZG);
        assert_eq!(versioned.0[1..], voltic_crypto::sha256(commitment).0[1..]);
        assert!(is_valid_versioned_hash(&versioned));
        assert!(!is_valid_versioned_hash(&B256::ZERO));
    }

    #[test]
    fn sizes() {
        assert_eq!(BYTES_PER_BLOB, 131_072);
        assert_eq!(Blob::LEN, BYTES_PER_BLOB);
        assert_eq!(Bytes48::LEN, BYTES_PER_COMMITMENT);
    }
}
