//! ECDSA over secp256k1: signing, verification, public-key recovery, and
//! address derivation.

use k256::{
    ecdsa::{RecoveryId, SigningKey, VerifyingKey},
    elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint},
    AffinePoint, EncodedPoint, ProjectivePoint,
};
use voltic_primitives::{keccak256, Address, Signature, B256, SECP256K1N_HALF};

/// An uncompressed secp256k1 public key: the 64-byte `x ‖ y` coordinate
/// pair, without the SEC1 `0x04` tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; 64]);

/// Opaque error for failed sender recovery.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, thiserror::Error)]
#[error("failed to recover the signer")]
pub struct RecoveryError;

/// Errors raised while signing or manipulating keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SigningError {
    /// The secret key is zero or not below the curve order.
    #[error("invalid secret key")]
    InvalidSecretKey,
    /// The public key bytes are not a valid curve point.
    #[error("invalid public key")]
    InvalidPublicKey,
    /// The backend failed to produce a signature.
    #[error("signing failed")]
    SigningFailed,
}

impl core::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "PublicKey({})", voltic_primitives::hex::encode_prefixed(self.0))
    }
}

impl PublicKey {
    /// Converts from the backend's verifying key.
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(&point.as_bytes()[1..]);
        Self(bytes)
    }

    /// Converts into the backend's verifying key, validating the point.
    pub fn to_verifying_key(&self) -> Result<VerifyingKey, SigningError> {
        let mut sec1 = [0u8; 65];
        sec1[0] = 0x04;
        sec1[1..].copy_from_slice(&self.0);
        VerifyingKey::from_sec1_bytes(&sec1).map_err(|_| SigningError::InvalidPublicKey)
    }

    /// The Ethereum address of this key: the low 20 bytes of
    /// `keccak256(x ‖ y)`.
    pub fn to_address(&self) -> Address {
        Address::from_word(keccak256(self.0))
    }
}

/// Derives the public key of a 32-byte secret key.
pub fn derive_public_key(secret: &B256) -> Result<PublicKey, SigningError> {
    let key = SigningKey::from_slice(secret.as_slice())
        .map_err(|_| SigningError::InvalidSecretKey)?;
    Ok(PublicKey::from_verifying_key(key.verifying_key()))
}

/// Converts a verifying key into an Ethereum address by hashing the
/// uncompressed public key.
pub fn public_key_to_address(public: &VerifyingKey) -> Address {
    let hash = keccak256(&public.to_encoded_point(false).as_bytes()[1..]);
    Address::from_word(hash)
}

/// Signs a 32-byte message hash with the given secret key.
///
/// The returned signature is always canonical (low-s, EIP-2).
pub fn sign_message(secret: &B256, message: &B256) -> Result<Signature, SigningError> {
    let key = SigningKey::from_slice(secret.as_slice())
        .map_err(|_| SigningError::InvalidSecretKey)?;
    let (signature, recovery_id) = key
        .sign_prehash_recoverable(message.as_slice())
        .map_err(|_| SigningError::SigningFailed)?;

    let mut parity = recovery_id.is_y_odd();
    let signature = if let Some(normalized) = signature.normalize_s() {
        parity = !parity;
        normalized
    } else {
        signature
    };

    let r = B256::from_slice(&signature.r().to_bytes());
    let s = B256::from_slice(&signature.s().to_bytes());
    Signature::from_scalars_and_parity(r, s, parity as u64)
        .map_err(|_| SigningError::SigningFailed)
}

/// Verifies a signature over a 32-byte message hash.
///
/// The signature is normalized first, so canonical and non-canonical forms
/// of the same signature verify identically.
pub fn verify_prehash(signature: &Signature, message: &B256, public: &PublicKey) -> bool {
    use k256::ecdsa::signature::hazmat::PrehashVerifier;

    let Ok(key) = public.to_verifying_key() else { return false };
    let normalized = signature.normalized();
    let Ok(backend_sig) = k256::ecdsa::Signature::from_scalars(
        normalized.r().to_be_bytes::<32>(),
        normalized.s().to_be_bytes::<32>(),
    ) else {
        return false;
    };
    key.verify_prehash(message.as_slice(), &backend_sig).is_ok()
}

/// Recovers the signer address, requiring a canonical (low-s) signature
/// per [EIP-2](https://eips.ethereum.org/EIPS/eip-2).
pub fn recover_signer(signature: &Signature, hash: &B256) -> Result<Address, RecoveryError> {
    if signature.s() > SECP256K1N_HALF {
        return Err(RecoveryError);
    }
    recover_signer_unchecked(signature, hash)
}

/// Recovers the signer address without enforcing a low `s` value.
///
/// Succeeds for malleable signatures; provided for compatibility with
/// pre-EIP-2 chain data.
pub fn recover_signer_unchecked(
    signature: &Signature,
    hash: &B256,
) -> Result<Address, RecoveryError> {
    signature.recover_address_from_prehash(hash).map_err(|_| RecoveryError)
}

/// Recovers the full public key from a signature over `hash`.
pub fn recover_public_key(
    signature: &Signature,
    hash: &B256,
) -> Result<PublicKey, RecoveryError> {
    signature
        .recover_from_prehash(hash)
        .map(|key| PublicKey::from_verifying_key(&key))
        .map_err(|_| RecoveryError)
}

/// Adds two public keys as curve points.
pub fn add_points(lhs: &PublicKey, rhs: &PublicKey) -> Result<PublicKey, SigningError> {
    let lhs = decode_point(lhs)?;
    let rhs = decode_point(rhs)?;
    let sum = ProjectivePoint::from(lhs) + ProjectivePoint::from(rhs);
    let affine = sum.to_affine();

    let encoded = affine.to_encoded_point(false);
    if encoded.is_identity() {
        return Err(SigningError::InvalidPublicKey);
    }
    let mut bytes = [0u8; 64];
    bytes.copy_from_slice(&encoded.as_bytes()[1..]);
    Ok(PublicKey(bytes))
}

/// Computes the ECDH shared secret: the x-coordinate of `secret * public`.
pub fn ecdh(secret: &B256, public: &PublicKey) -> Result<B256, SigningError> {
    let key = SigningKey::from_slice(secret.as_slice())
        .map_err(|_| SigningError::InvalidSecretKey)?;
    let point = decode_point(public)?;

    let shared = k256::ecdh::diffie_hellman(key.as_nonzero_scalar(), &point);
    Ok(B256::from_slice(shared.raw_secret_bytes()))
}

fn decode_point(public: &PublicKey) -> Result<AffinePoint, SigningError> {
    let mut sec1 = [0u8; 65];
    sec1[0] = 0x04;
    sec1[1..].copy_from_slice(&public.0);
    let encoded =
        EncodedPoint::from_bytes(sec1).map_err(|_| SigningError::InvalidPublicKey)?;
    Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
        .ok_or(SigningError::InvalidPublicKey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voltic_primitives::b256;

    fn secret() -> B256 {
        b256!("4646464646464646464646464646464646464646464646464646464646464646")
    }

    #[test]
    fn sign_recover_roundtrip() {
        let message = keccak256(b"hello world");
        let signature = sign_message(&secret(), &message).unwrap();
        assert!(signature.is_canonical());

        let public = derive_public_key(&secret()).unwrap();
        let recovered = recover_signer(&signature, &message).unwrap();
        assert_eq!(recovered, public.to_address());
    }

    #[test]
    fn verify_accepts_and_rejects() {
        let message = keccak256(b"payload");
        let signature = sign_message(&secret(), &message).unwrap();
        let public = derive_public_key(&secret()).unwrap();

        assert!(verify_prehash(&signature, &message, &public));
        assert!(!verify_prehash(&signature, &keccak256(b"other"), &public));
    }

    #[test]
    fn verify_is_normalization_invariant() {
        use voltic_primitives::{Signature, SECP256K1N};

        let message = keccak256(b"normalize me");
        let signature = sign_message(&secret(), &message).unwrap();
        let public = derive_public_key(&secret()).unwrap();

        let high_s = Signature::new_unchecked(
            signature.r(),
            SECP256K1N - signature.s(),
            !signature.y_parity(),
        );
        assert_eq!(
            verify_prehash(&high_s, &message, &public),
            verify_prehash(&signature, &message, &public),
        );
    }

    #[test]
    fn strict_recovery_rejects_high_s() {
        use voltic_primitives::{Signature, SECP256K1N};

        let message = keccak256(b"strict");
        let signature = sign_message(&secret(), &message).unwrap();
        let high_s = Signature::new_unchecked(
            signature.r(),
            SECP256K1N - signature.s(),
            !signature.y_parity(),
        );

        assert_eq!(recover_signer(&high_s, &message), Err(RecoveryError));
        assert_eq!(
            recover_signer_unchecked(&high_s, &message).unwrap(),
            recover_signer(&signature, &message).unwrap(),
        );
    }

    #[test]
    fn address_derivation_matches_known_vector() {
        // the EIP-155 example key 0x4646...46 controls this address
        let public = derive_public_key(&secret()).unwrap();
        assert_eq!(
            public.to_address(),
            voltic_primitives::address!("9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f")
        );
    }

    #[test]
    fn ecdh_is_symmetric() {
        let a = b256!("0101010101010101010101010101010101010101010101010101010101010101");
        let b = b256!("0202020202020202020202020202020202020202020202020202020202020202");
        let pk_a = derive_public_key(&a).unwrap();
        let pk_b = derive_public_key(&b).unwrap();
        assert_eq!(ecdh(&a, &pk_b).unwrap(), ecdh(&b, &pk_a).unwrap());
    }

    #[test]
    fn point_addition_is_commutative() {
        let a = derive_public_key(&b256!(
            "0101010101010101010101010101010101010101010101010101010101010101"
        ))
        .unwrap();
        let b = derive_public_key(&b256!(
            "0202020202020202020202020202020202020202020202020202020202020202"
        ))
        .unwrap();
        assert_eq!(add_points(&a, &b).unwrap(), add_points(&b, &a).unwrap());
    }

    #[test]
    fn rejects_zero_secret() {
        assert_eq!(derive_public_key(&B256::ZERO), Err(SigningError::InvalidSecretKey));
    }

    #[test]
    fn random_keys_roundtrip() {
        let key = SigningKey::random(&mut rand::thread_rng());
        let secret = B256::from_slice(&key.to_bytes());

        let message = keccak256(b"fresh key");
        let signature = sign_message(&secret, &message).unwrap();
        assert!(signature.is_canonical());
        assert_eq!(
            recover_signer(&signature, &message).unwrap(),
            public_key_to_address(key.verifying_key()),
        );
    }
}
