use crate::B256;
use tiny_keccak::{Hasher, Keccak};

/// Computes the Keccak-256 hash of the input.
pub fn keccak256(bytes: impl AsRef<[u8]>) -> B256 {
    let mut output = B256::ZERO;
    let mut hasher = Keccak::v256();
    hasher.update(bytes.as_ref());
    hasher.finalize(&mut output.0);
    output
}

/// A streaming Keccak-256 hasher.
#[derive(Clone)]
pub struct Keccak256 {
    hasher: Keccak,
}

impl core::fmt::Debug for Keccak256 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Keccak256 { .. }")
    }
}

impl Default for Keccak256 {
    fn default() -> Self {
        Self::new()
    }
}

impl Keccak256 {
    /// Creates a fresh hasher.
    pub fn new() -> Self {
        Self { hasher: Keccak::v256() }
    }

    /// Absorbs more input.
    pub fn update(&mut self, bytes: impl AsRef<[u8]>) {
        self.hasher.update(bytes.as_ref());
    }

    /// Consumes the hasher and returns the digest.
    pub fn finalize(self) -> B256 {
        let mut output = B256::ZERO;
        self.hasher.finalize(&mut output.0);
        output
    }
}
