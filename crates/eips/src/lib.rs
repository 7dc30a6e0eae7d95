//! Ethereum Improvement Proposal primitives.
//!
//! - [`eip2718`]: typed-envelope encoding and decoding traits
//! - [`eip2930`]: access lists
//! - [`eip1559`]: dynamic-fee arithmetic
//! - [`eip4844`]: blobs, KZG commitments, and the process-wide trusted
//!   setup
//! - [`eip7702`]: signed delegation authorizations

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod eip1559;
pub mod eip2718;
pub mod eip2930;
pub mod eip4844;
pub mod eip7702;
