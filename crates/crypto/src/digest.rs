//! One-shot digest helpers over the RustCrypto hashers.
//!
//! The hasher types themselves are re-exported for streaming use; all of
//! them implement [`sha2::Digest`].

use voltic_primitives::{FixedBytes, B256};

pub use blake2::Blake2b512;
pub use ripemd::Ripemd160;
pub use sha2::{Digest, Sha256};

/// HMAC-SHA256 keyed hasher.
pub type HmacSha256 = hmac::Hmac<Sha256>;

/// Computes the SHA-256 hash of the input.
pub fn sha256(bytes: impl AsRef<[u8]>) -> B256 {
    B256::from_slice(&Sha256::digest(bytes.as_ref()))
}

/// Computes the RIPEMD-160 hash of the input.
pub fn ripemd160(bytes: impl AsRef<[u8]>) -> FixedBytes<20> {
    FixedBytes::from_slice(&Ripemd160::digest(bytes.as_ref()))
}

/// Computes the 64-byte BLAKE2b-512 hash of the input.
pub fn blake2b512(bytes: impl AsRef<[u8]>) -> FixedBytes<64> {
    FixedBytes::from_slice(&Blake2b512::digest(bytes.as_ref()))
}

/// Computes the HMAC-SHA256 authentication code of `data` under `key`.
pub fn hmac_sha256(key: &[u8], data: impl AsRef<[u8]>) -> B256 {
    use hmac::Mac;

    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .expect("HMAC accepts keys of any length");
    mac.update(data.as_ref());
    B256::from_slice(&mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn sha256_empty() {
        assert_eq!(
            sha256([]).0,
            hex!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
        );
    }

    #[test]
    fn sha256_abc() {
        assert_eq!(
            sha256(b"abc").0,
            hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
    }

    #[test]
    fn ripemd160_abc() {
        assert_eq!(ripemd160(b"abc").0, hex!("8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"));
    }

    #[test]
    fn hmac_sha256_rfc4231_case_2() {
        // RFC 4231 test case 2: key "Jefe", data "what do ya want for nothing?"
        assert_eq!(
            hmac_sha256(b"Jefe", b"what do ya want for nothing?").0,
            hex!("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
        );
    }

    #[test]
    fn streaming_matches_one_shot() {
        let mut hasher = Sha256::new();
        hasher.update(b"ab");
        hasher.update(b"c");
        assert_eq!(B256::from_slice(&hasher.finalize()), sha256(b"abc"));
    }
}
