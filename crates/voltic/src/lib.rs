//! Ethereum execution-layer primitives.
//!
//! This is a facade over the workspace crates:
//!
//! - [`primitives`]: bytes, addresses, hashes, signatures, blooms, units
//! - [`rlp`]: the recursive-length-prefix codec
//! - [`crypto`]: the secp256k1 pipeline and digest family
//! - [`eips`]: EIP-2718/2930/1559/4844/7702 building blocks
//! - [`consensus`]: typed transactions, receipts, blocks
//! - [`evm`]: opcode metadata and bytecode analysis
//! - [`filter`]: event-log filtering

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[doc(inline)]
pub use voltic_consensus as consensus;
#[doc(inline)]
pub use voltic_crypto as crypto;
#[doc(inline)]
pub use voltic_eips as eips;
#[doc(inline)]
pub use voltic_evm as evm;
#[doc(inline)]
pub use voltic_filter as filter;
#[doc(inline)]
pub use voltic_primitives as primitives;
#[doc(inline)]
pub use voltic_rlp as rlp;
