//! Cryptographic primitives: the secp256k1 signature pipeline and the
//! non-Keccak digest family.
//!
//! Keccak-256 lives in `voltic_primitives` next to the types it hashes;
//! everything else (ECDSA over secp256k1, SHA-256, RIPEMD-160,
//! BLAKE2b-512, HMAC-SHA256) is here.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod digest;
pub mod secp256k1;

pub use digest::{blake2b512, hmac_sha256, ripemd160, sha256};
pub use secp256k1::{
    derive_public_key, ecdh, public_key_to_address, recover_public_key, recover_signer,
    recover_signer_unchecked, sign_message, verify_prehash, PublicKey, RecoveryError,
    SigningError,
};
