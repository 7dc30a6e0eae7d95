//! The process-wide KZG trusted setup and the commitment operations that
//! depend on it.
//!
//! The setup is a single shared resource guarded by a readers-writer
//! lock: [`load_trusted_setup`] and [`free_trusted_setup`] take the write
//! side, every commit/prove/verify call takes the read side for its whole
//! duration. Loading is idempotent. Callers must order `load → work →
//! free`; operations between `free` and a reload fail with
//! [`KzgError::NotInitialized`].

use super::{Blob, Bytes48, BYTES_PER_BLOB};
use c_kzg::KzgSettings;
use std::{
    path::Path,
    sync::{Arc, RwLock, RwLockReadGuard},
};
use voltic_primitives::B256;

/// Precompute level passed to the backend; 0 because cell proofs are not
/// computed here.
const PRECOMPUTE: u64 = 0;

static SETUP: RwLock<Option<Setup>> = RwLock::new(None);

/// The loaded setup: the embedded mainnet parameters or a caller-supplied
/// file.
#[derive(Clone)]
enum Setup {
    Default,
    Custom(Arc<KzgSettings>),
}

impl Setup {
    fn settings(&self) -> &KzgSettings {
        match self {
            Self::Default => c_kzg::ethereum_kzg_settings(PRECOMPUTE),
            Self::Custom(settings) => settings,
        }
    }
}

/// Errors raised by KZG operations.
#[derive(Debug, thiserror::Error)]
pub enum KzgError {
    /// An operation ran before [`load_trusted_setup`] (or after
    /// [`free_trusted_setup`]).
    #[error("KZG trusted setup is not loaded")]
    NotInitialized,
    /// Batch blob verification is a documented limitation; shapes are
    /// validated and then this is returned.
    #[error("batch blob verification is not implemented")]
    BatchVerifyUnsupported,
    /// The input collections of a batch call disagree in length.
    #[error("batch length mismatch: {blobs} blobs, {commitments} commitments, {proofs} proofs")]
    BatchLengthMismatch {
        /// Number of blobs supplied.
        blobs: usize,
        /// Number of commitments supplied.
        commitments: usize,
        /// Number of proofs supplied.
        proofs: usize,
    },
    /// The backend rejected the input or the setup file.
    #[error(transparent)]
    Backend(#[from] c_kzg::Error),
}

/// Loads the trusted setup, making commitment operations available.
///
/// With `None` the embedded Ethereum mainnet setup is used; with a path,
/// the file must be in the standard `g1_lagrange ++ g2_monomial` format.
/// Loading is idempotent: a second call while a setup is resident keeps
/// the resident one.
pub fn load_trusted_setup(path: Option<&Path>) -> Result<(), KzgError> {
    let mut guard = SETUP.write().expect("KZG setup lock poisoned");
    if guard.is_some() {
        tracing::debug!("KZG trusted setup already loaded, keeping resident setup");
        return Ok(());
    }

    let setup = match path {
        None => {
            tracing::debug!("loading embedded mainnet KZG trusted setup");
            Setup::Default
        }
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading KZG trusted setup from file");
            let settings = KzgSettings::load_trusted_setup_file(path, PRECOMPUTE)?;
            Setup::Custom(Arc::new(settings))
        }
    };
    *guard = Some(setup);
    Ok(())
}

/// Frees the trusted setup.
///
/// Callers must ensure no commitment operation is in flight; the write
/// lock serializes against the read side, so any call that already holds
/// a read guard completes first.
pub fn free_trusted_setup() {
    let mut guard = SETUP.write().expect("KZG setup lock poisoned");
    if guard.take().is_some() {
        tracing::debug!("freed KZG trusted setup");
    }
}

/// True if a setup is resident.
pub fn is_initialized() -> bool {
    SETUP.read().expect("KZG setup lock poisoned").is_some()
}

struct SetupGuard {
    guard: RwLockReadGuard<'static, Option<Setup>>,
}

impl SetupGuard {
    fn acquire() -> Result<Self, KzgError> {
        let guard = SETUP.read().expect("KZG setup lock poisoned");
        if guard.is_none() {
            return Err(KzgError::NotInitialized);
        }
        Ok(Self { guard })
    }

    fn settings(&self) -> &KzgSettings {
        self.guard.as_ref().expect("checked at acquisition").settings()
    }
}

/// Computes the KZG commitment of a blob.
pub fn blob_to_commitment(blob: &Blob) -> Result<Bytes48, KzgError> {
    let setup = SetupGuard::acquire()?;
    let blob = c_kzg::Blob::from_bytes(blob.as_slice())?;
    let commitment = setup.settings().blob_to_kzg_commitment(&blob)?;
    Ok(Bytes48::from_slice(commitment.to_bytes().as_slice()))
}

/// Computes the proof that the blob's polynomial evaluates to `y` at
/// point `z`; returns `(proof, y)`.
pub fn compute_proof(blob: &Blob, z: &B256) -> Result<(Bytes48, B256), KzgError> {
    let setup = SetupGuard::acquire()?;
    let blob = c_kzg::Blob::from_bytes(blob.as_slice())?;
    let z = c_kzg::Bytes32::from_bytes(z.as_slice())?;
    let (proof, y) = setup.settings().compute_kzg_proof(&blob, &z)?;
    Ok((
        Bytes48::from_slice(proof.to_bytes().as_slice()),
        B256::from_slice(y.as_slice()),
    ))
}

/// Verifies a KZG proof that the polynomial behind `commitment`
/// evaluates to `y` at `z`.
pub fn verify_proof(
    commitment: &Bytes48,
    z: &B256,
    y: &B256,
    proof: &Bytes48,
) -> Result<bool, KzgError> {
    let setup = SetupGuard::acquire()?;
    let commitment = c_kzg::Bytes48::from_bytes(commitment.as_slice())?;
    let z = c_kzg::Bytes32::from_bytes(z.as_slice())?;
    let y = c_kzg::Bytes32::from_bytes(y.as_slice())?;
    let proof = c_kzg::Bytes48::from_bytes(proof.as_slice())?;
    Ok(setup.settings().verify_kzg_proof(&commitment, &z, &y, &proof)?)
}

/// Computes the whole-blob proof for `blob` under `commitment`.
pub fn compute_blob_proof(blob: &Blob, commitment: &Bytes48) -> Result<Bytes48, KzgError> {
    let setup = SetupGuard::acquire()?;
    let blob = c_kzg::Blob::from_bytes(blob.as_slice())?;
    let commitment = c_kzg::Bytes48::from_bytes(commitment.as_slice())?;
    let proof = setup.settings().compute_blob_kzg_proof(&blob, &commitment)?;
    Ok(Bytes48::from_slice(proof.to_bytes().as_slice()))
}

/// Verifies a whole-blob proof against its commitment.
pub fn verify_blob_proof(
    blob: &Blob,
    commitment: &Bytes48,
    proof: &Bytes48,
) -> Result<bool, KzgError> {
    let setup = SetupGuard::acquire()?;
    let blob = c_kzg::Blob::from_bytes(blob.as_slice())?;
    let commitment = c_kzg::Bytes48::from_bytes(commitment.as_slice())?;
    let proof = c_kzg::Bytes48::from_bytes(proof.as_slice())?;
    Ok(setup.settings().verify_blob_kzg_proof(&blob, &commitment, &proof)?)
}

/// Validates the shapes of a batch and then fails with
/// [`KzgError::BatchVerifyUnsupported`].
///
/// Batch verification is a documented limitation; use
/// [`verify_blob_proof`] per blob instead.
pub fn verify_blob_proof_batch(
    blobs: &[Blob],
    commitments: &[Bytes48],
    proofs: &[Bytes48],
) -> Result<bool, KzgError> {
    let _setup = SetupGuard::acquire()?;
    if blobs.len() != commitments.len() || blobs.len() != proofs.len() {
        return Err(KzgError::BatchLengthMismatch {
            blobs: blobs.len(),
            commitments: commitments.len(),
            proofs: proofs.len(),
        });
    }
    Err(KzgError::BatchVerifyUnsupported)
}

/// A blob whose length is validated at construction.
pub fn blob_from_slice(bytes: &[u8]) -> Result<Blob, KzgError> {
    Blob::try_from_slice(bytes).map_err(|_| {
        c_kzg::Error::InvalidBytesLength(format!(
            "invalid blob length: expected {BYTES_PER_BLOB}, got {}",
            bytes.len()
        ))
        .into()
    })
}
