//! Ethereum primitive types.
//!
//! The building blocks every higher-level crate in this workspace is made
//! of: fixed-width byte arrays, addresses, the Keccak-256 hash, ECDSA
//! signatures, the 2048-bit log bloom, event logs, and wei-denomination
//! arithmetic.
//!
//! All types are plain immutable values. The sole in-place mutator is
//! [`Bloom::accrue`]; [`Bloom::with`] is the copying alternative.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
mod macros;

mod address;
mod bloom;
mod bytes_;
mod fixed;
mod keccak;
mod log;
mod signature;
mod signed;
mod tx_kind;

pub mod constants;
pub mod units;

pub use address::{Address, AddressError};
pub use bloom::{Bloom, BloomInput, BLOOM_BITS_PER_ITEM, BLOOM_SIZE_BITS, BLOOM_SIZE_BYTES};
pub use bytes_::Bytes;
pub use fixed::{FixedBytes, InvalidLength};
pub use keccak::{keccak256, Keccak256};
pub use log::{Log, LogData};
pub use signature::{normalize_v, Signature, SignatureError, SECP256K1N, SECP256K1N_HALF};
pub use signed::{Signed, SignedOverflow, I128, I16, I256, I32, I64, I8};
pub use tx_kind::TxKind;

/// Hex encoding and decoding (re-export of [`const_hex`]).
pub use const_hex as hex;

#[doc(hidden)]
pub use hex_literal;

/// 256-bit unsigned integer and friends.
pub use ruint::{
    self,
    aliases::{U128, U16, U256, U32, U512, U64, U8},
};

/// A 4-byte solidity function selector.
pub type Selector = FixedBytes<4>;

/// An 8-byte fixed array (block nonces).
pub type B64 = FixedBytes<8>;

/// A 16-byte fixed array.
pub type B128 = FixedBytes<16>;

/// A 32-byte fixed array (hashes, storage keys, salts).
pub type B256 = FixedBytes<32>;

/// A 64-byte fixed array (uncompressed public key body).
pub type B512 = FixedBytes<64>;

/// A transaction hash.
pub type TxHash = B256;

/// A block hash.
pub type BlockHash = B256;

/// A storage key.
pub type StorageKey = B256;

/// An EIP-155 chain id.
pub type ChainId = u64;

/// A block number.
pub type BlockNumber = u64;

/// A transaction index within a block.
pub type TxIndex = u64;
